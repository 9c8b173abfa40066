//! This module is responsible for building road networks, either from a JSON
//! description or from the radial junction template.

mod builder;
pub mod raw_types;
pub mod template;

pub use builder::{create_road_network, load_road_network, parse_road_network};
pub use template::{TemplateArm, LaneLayout, RadialJunctionTemplate};
