//! Serialization of built junctions: OpenDRIVE fragments and GeoJSON

pub mod opendrive;
mod to_geojson;

pub use opendrive::{connecting_roads_to_xml, connection_to_xml, junction_to_xml};
pub use to_geojson::{junction_to_geojson, junction_to_geojson_string};
