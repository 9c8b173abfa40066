//! Data model for road networks
//!
//! Roads with lane sections, the junctions they meet at, and the network owning both.

pub mod junction;
pub mod lane;
pub mod network;
pub mod road;

pub use junction::Junction;
pub use lane::{
    Lane, LaneCoord, LaneEdge, LaneSection, LaneSide, LaneType, LaneWidth, TravelDirection,
};
pub use network::RoadNetwork;
pub use road::{ContactPoint, LinkElement, Road, RoadContact, RoadCoord, RoadLink};
