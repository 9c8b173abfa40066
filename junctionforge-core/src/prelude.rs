pub use crate::config::JunctionConfig;

// Re-export key components
pub use crate::boundary::{BoundaryAssembler, BoundaryKind, JunctionBoundary, SegmentKind};
pub use crate::export::{junction_to_geojson, junction_to_xml};
pub use crate::geometry::{LineGeometry, ReferenceLineFactory, RoadGeometry};
pub use crate::loading::{RadialJunctionTemplate, load_road_network};
pub use crate::model::{ContactPoint, Junction, LaneType, Road, RoadNetwork};
pub use crate::topology::{JunctionConnection, TurnType, rebuild_all_junctions, rebuild_junction};

// Identifier types
pub use crate::JunctionId;
pub use crate::LaneId;
pub use crate::RoadId;
