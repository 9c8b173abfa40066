use serde::Deserialize;

use crate::model::{ContactPoint, LaneType, TravelDirection};
use crate::{JunctionId, LaneId, RoadId};

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawNetwork {
    pub junctions: Vec<RawJunction>,
    pub roads: Vec<RawRoad>,
}

#[derive(Debug, Deserialize)]
pub struct RawJunction {
    pub id: JunctionId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawRoad {
    pub id: RoadId,
    #[serde(default)]
    pub name: String,
    pub length: f64,
    /// Owning junction of a connecting road
    #[serde(default)]
    pub junction: Option<JunctionId>,
    #[serde(default)]
    pub predecessor: Option<RawLink>,
    #[serde(default)]
    pub successor: Option<RawLink>,
    #[serde(default)]
    pub reference_line: Option<RawReferenceLine>,
    #[serde(default)]
    pub lane_sections: Vec<RawLaneSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawElementType {
    Road,
    Junction,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawLink {
    pub element_type: RawElementType,
    pub element_id: u32,
    #[serde(default)]
    pub contact_point: Option<ContactPoint>,
}

/// Either a line of its own or a span of another road's line
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(default)]
pub struct RawReferenceLine {
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise from the x axis
    pub heading: f64,
    pub shared_with: Option<RoadId>,
    pub s_offset: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawLaneSection {
    pub s: f64,
    pub lanes: Vec<RawLane>,
}

#[derive(Debug, Deserialize)]
pub struct RawLane {
    pub id: LaneId,
    #[serde(rename = "type", default)]
    pub lane_type: LaneType,
    pub width: f64,
    #[serde(default)]
    pub direction: Option<TravelDirection>,
}
