//! Junction topology: turn classification, lane pairing and connection synthesis

mod builder;
pub mod connection;
pub mod lane_pairs;
pub mod ordering;
pub mod turn;
mod turns;

pub use builder::ConnectionBuilder;
pub use connection::{JunctionConnection, LaneLink};
pub use lane_pairs::{LanePair, lane_pairs};
pub use turn::{TurnClassifier, TurnType, classify_direction};

use log::info;

use crate::boundary::{BoundaryAssembler, BoundaryKind};
use crate::config::JunctionConfig;
use crate::geometry::ReferenceLineFactory;
use crate::model::RoadNetwork;
use crate::{Error, JunctionId};

/// Rebuilds connections and the outer boundary of one junction
///
/// Both are recomputed from scratch and swapped into the junction once
/// complete. The exclusive borrow of the network rules out a second rebuild
/// starting while this one runs.
///
/// # Errors
///
/// Returns an error if the junction or one of its linked roads does not exist
pub fn rebuild_junction<G: ReferenceLineFactory + ?Sized>(
    network: &mut RoadNetwork,
    geometry: &mut G,
    junction_id: JunctionId,
    config: &JunctionConfig,
) -> Result<(), Error> {
    ConnectionBuilder::new(geometry, *config).build(network, junction_id, &[])?;

    let boundary =
        BoundaryAssembler::new(&*geometry, *config, BoundaryKind::Outer).assemble(network, junction_id)?;

    network
        .junction_mut(junction_id)
        .ok_or(Error::JunctionNotFound(junction_id))?
        .replace_boundary(boundary);
    Ok(())
}

/// Rebuilds every junction of the network
///
/// # Errors
///
/// Returns the first error encountered
pub fn rebuild_all_junctions<G: ReferenceLineFactory + ?Sized>(
    network: &mut RoadNetwork,
    geometry: &mut G,
    config: &JunctionConfig,
) -> Result<(), Error> {
    let junction_ids = network.junction_ids();
    for junction_id in &junction_ids {
        rebuild_junction(network, geometry, *junction_id, config)?;
    }
    info!("Rebuilt {} junctions", junction_ids.len());
    Ok(())
}
