use geojson::FeatureCollection;
use junctionforge_core::export::{
    connecting_roads_to_xml, junction_to_geojson, junction_to_xml,
};
use junctionforge_core::loading::{LaneLayout, RadialJunctionTemplate, load_road_network};
use junctionforge_core::model::{ContactPoint, RoadNetwork};
use junctionforge_core::{
    BoundaryKind, JunctionConfig, JunctionId, LineGeometry, rebuild_all_junctions,
    rebuild_junction,
};
use rayon::prelude::*;
use tracing::info;

use crate::cli::{BoundaryArgs, Cli, Command, ConnectionsArgs, DemoArgs};
use crate::error::CliError;
use crate::settings::Settings;

pub fn run(cli: Cli) -> Result<(), CliError> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let output = match cli.command {
        Command::Connections(args) => connections(&args, &settings)?,
        Command::Boundary(args) => boundary(&args, &settings)?,
        Command::Demo(args) => demo(&args, &settings)?,
    };
    print!("{output}");
    Ok(())
}

fn connections(args: &ConnectionsArgs, settings: &Settings) -> Result<String, CliError> {
    let (mut network, mut geometry) = load_road_network(&args.network)?;
    let junction_ids = rebuild(&mut network, &mut geometry, args.junction, &settings.junction)?;

    render_xml(
        &network,
        &junction_ids,
        args.roads || settings.output.connecting_roads,
    )
}

fn boundary(args: &BoundaryArgs, settings: &Settings) -> Result<String, CliError> {
    let (mut network, mut geometry) = load_road_network(&args.network)?;
    let junction_ids = rebuild(&mut network, &mut geometry, args.junction, &settings.junction)?;

    let kind = if args.inner {
        BoundaryKind::Inner
    } else {
        settings.output.boundary_kind
    };
    render_geojson(
        &network,
        &geometry,
        &settings.junction,
        &junction_ids,
        kind,
        args.pretty || settings.output.pretty,
    )
}

fn demo(args: &DemoArgs, settings: &Settings) -> Result<String, CliError> {
    if let Some(index) = args.start_arms.iter().find(|&&index| index >= args.arms.len()) {
        return Err(CliError::InvalidArguments(format!(
            "Arm index {index} out of range for {} arms",
            args.arms.len()
        )));
    }

    let layout = LaneLayout {
        driving_per_side: args.lanes,
        sidewalk_width: if args.no_sidewalks {
            None
        } else {
            LaneLayout::default().sidewalk_width
        },
        ..LaneLayout::default()
    };
    let template = args.start_arms.iter().fold(
        RadialJunctionTemplate::new(&args.arms).with_layout(layout),
        |template, &index| template.with_contact(index, ContactPoint::Start),
    );

    let (mut network, mut geometry, junction_id) = template.build()?;
    rebuild_junction(&mut network, &mut geometry, junction_id, &settings.junction)?;
    log_summary(&network, junction_id);

    if args.geojson {
        render_geojson(
            &network,
            &geometry,
            &settings.junction,
            &[junction_id],
            settings.output.boundary_kind,
            settings.output.pretty,
        )
    } else {
        render_xml(&network, &[junction_id], true)
    }
}

/// Rebuilds one junction, or every junction when none is requested
fn rebuild(
    network: &mut RoadNetwork,
    geometry: &mut LineGeometry,
    junction_id: Option<JunctionId>,
    config: &JunctionConfig,
) -> Result<Vec<JunctionId>, CliError> {
    let junction_ids = match junction_id {
        Some(junction_id) => {
            rebuild_junction(network, geometry, junction_id, config)?;
            vec![junction_id]
        }
        None => {
            rebuild_all_junctions(network, geometry, config)?;
            network.junction_ids()
        }
    };
    for junction_id in &junction_ids {
        log_summary(network, *junction_id);
    }
    Ok(junction_ids)
}

fn log_summary(network: &RoadNetwork, junction_id: JunctionId) {
    if let Some(junction) = network.junction(junction_id) {
        info!(
            junction = junction_id,
            connections = junction.connection_count(),
            corners = junction.corner_connections().count(),
            boundary_segments = junction.boundary().map_or(0, |b| b.segment_count()),
            "junction rebuilt"
        );
    }
}

fn render_xml(
    network: &RoadNetwork,
    junction_ids: &[JunctionId],
    with_roads: bool,
) -> Result<String, CliError> {
    let mut out = String::new();
    for &junction_id in junction_ids {
        out.push_str(&junction_to_xml(network, junction_id)?);
        if with_roads {
            out.push_str(&connecting_roads_to_xml(network, junction_id)?);
        }
    }
    Ok(out)
}

/// Junctions are exported in parallel; export only reads the network
fn render_geojson(
    network: &RoadNetwork,
    geometry: &LineGeometry,
    config: &JunctionConfig,
    junction_ids: &[JunctionId],
    kind: BoundaryKind,
    pretty: bool,
) -> Result<String, CliError> {
    let collections = junction_ids
        .par_iter()
        .map(|&junction_id| junction_to_geojson(network, geometry, config, junction_id, kind))
        .collect::<Result<Vec<_>, _>>()?;

    let collection = FeatureCollection {
        features: collections
            .into_iter()
            .flat_map(|collection| collection.features)
            .collect(),
        bbox: None,
        foreign_members: None,
    };

    let mut json = if pretty {
        serde_json::to_string_pretty(&collection)?
    } else {
        serde_json::to_string(&collection)?
    };
    json.push('\n');
    Ok(json)
}
