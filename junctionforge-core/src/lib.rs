//! Junction topology synthesis for OpenDRIVE-style road networks.
//!
//! Roads meeting at a junction are connected by directed connections that pair
//! incoming lanes with outgoing lanes through a connecting road, and the junction
//! perimeter is assembled from those connections into an ordered boundary ring.

pub mod boundary;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod topology;

pub use boundary::{
    BoundaryAssembler, BoundaryKind, BoundarySegment, JointBoundarySegment, JunctionBoundary,
    LaneBoundarySegment, SegmentKind,
};
pub use config::JunctionConfig;
pub use error::Error;
pub use geometry::{LineGeometry, ReferenceLineFactory, RoadGeometry, RoadPosition, SideWidths};
pub use model::{
    ContactPoint, Junction, Lane, LaneCoord, LaneSection, LaneType, LinkElement, Road,
    RoadContact, RoadCoord, RoadLink, RoadNetwork,
};
pub use topology::{
    ConnectionBuilder, JunctionConnection, LaneLink, LanePair, TurnClassifier, TurnType,
    lane_pairs, rebuild_all_junctions, rebuild_junction,
};

/// Road identifier, unique within a network
pub type RoadId = u32;
/// Junction identifier, unique within a network
pub type JunctionId = u32;
/// Connection identifier, unique within a junction
pub type ConnectionId = u32;
/// Lane identifier: positive left of the reference line, negative right, 0 centre
pub type LaneId = i32;
/// Identity of a reference line geometry, shared by roads split from one line
pub type ReferenceLineId = u32;
