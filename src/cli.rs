use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use junctionforge_core::JunctionId;

#[derive(Parser, Debug)]
#[command(
    name = "junctionforge",
    version,
    about = "Junction connection and boundary synthesis for OpenDRIVE road networks",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Settings file (TOML).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log verbosity (repeat for more). `RUST_LOG` overrides.
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild junction connections and print them as OpenDRIVE XML.
    Connections(ConnectionsArgs),

    /// Rebuild junctions and print their boundaries as GeoJSON.
    Boundary(BoundaryArgs),

    /// Build a radial junction from arm angles and print it.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub struct ConnectionsArgs {
    /// JSON road network description.
    pub network: PathBuf,

    /// Only this junction (default: all).
    #[arg(long, value_name = "ID")]
    pub junction: Option<JunctionId>,

    /// Also print the connecting roads.
    #[arg(long)]
    pub roads: bool,
}

#[derive(Args, Debug)]
pub struct BoundaryArgs {
    /// JSON road network description.
    pub network: PathBuf,

    /// Only this junction (default: all).
    #[arg(long, value_name = "ID")]
    pub junction: Option<JunctionId>,

    /// Carriageway boundary instead of the full road width.
    #[arg(long)]
    pub inner: bool,

    /// Pretty-print the GeoJSON.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Arm directions in degrees, counter-clockwise from east.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "0,90,180,270",
        allow_hyphen_values = true
    )]
    pub arms: Vec<f64>,

    /// Indices of arms that start (rather than end) at the junction.
    #[arg(long, value_delimiter = ',', value_name = "INDEX")]
    pub start_arms: Vec<usize>,

    /// Driving lanes per side.
    #[arg(long, default_value_t = 1)]
    pub lanes: u32,

    /// Leave out sidewalks.
    #[arg(long)]
    pub no_sidewalks: bool,

    /// Print GeoJSON instead of OpenDRIVE XML.
    #[arg(long)]
    pub geojson: bool,
}
