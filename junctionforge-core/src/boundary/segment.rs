//! Geometric primitives of a junction perimeter

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::JunctionConfig;
use crate::geometry::{RoadGeometry, RoadPosition, has_geometry, lane_edge_position};
use crate::model::{ContactPoint, Lane, LaneEdge, Road, RoadNetwork};
use crate::{LaneId, RoadId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Joint,
    Lane,
}

/// Cross-section where a road meets the junction interior
#[derive(Debug, Clone, PartialEq)]
pub struct JointBoundarySegment {
    pub road_id: RoadId,
    pub contact_point: ContactPoint,
    /// Lane whose edge starts the cross-section
    pub joint_lane_start: LaneId,
    /// Lane whose edge ends the cross-section
    pub joint_lane_end: LaneId,
}

impl JointBoundarySegment {
    pub fn outer_points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
    ) -> Vec<RoadPosition> {
        self.points(network, geometry, LaneEdge::Outer)
    }

    pub fn inner_points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
    ) -> Vec<RoadPosition> {
        self.points(network, geometry, LaneEdge::Inner)
    }

    /// Start lane edge, the middle of the cross-section, end lane edge
    fn points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        edge: LaneEdge,
    ) -> Vec<RoadPosition> {
        let Some(road) = evaluable_road(network, geometry, self.road_id) else {
            return Vec::new();
        };

        let s = road.s_at(self.contact_point);
        let widths = geometry.widths_at(road, s);

        let start = lane_edge_position(geometry, road, self.joint_lane_start, edge, s);
        let mid = geometry.position_at(road, s, (widths.left - widths.right) / 2.0);
        let end = lane_edge_position(geometry, road, self.joint_lane_end, edge, s);

        [start, mid, end].into_iter().flatten().collect()
    }
}

/// Perimeter strip along one lane edge of a connecting road
#[derive(Debug, Clone, PartialEq)]
pub struct LaneBoundarySegment {
    pub road_id: RoadId,
    pub lane_id: LaneId,
    pub s_start: f64,
    pub s_end: f64,
}

impl LaneBoundarySegment {
    pub fn new(road_id: RoadId, lane_id: LaneId, s_start: f64, s_end: f64) -> Self {
        Self {
            road_id,
            lane_id,
            s_start: s_start.min(s_end),
            s_end: s_end.max(s_start),
        }
    }

    /// The lane this strip runs along
    pub fn lane<'n>(&self, network: &'n RoadNetwork) -> Option<&'n Lane> {
        network
            .road(self.road_id)?
            .lane_section_at_s(self.s_start)?
            .lane(self.lane_id)
    }

    pub fn outer_points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Vec<RoadPosition> {
        self.points(network, geometry, config, LaneEdge::Outer)
    }

    pub fn inner_points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Vec<RoadPosition> {
        self.points(network, geometry, config, LaneEdge::Inner)
    }

    fn points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
        edge: LaneEdge,
    ) -> Vec<RoadPosition> {
        let Some(road) = evaluable_road(network, geometry, self.road_id) else {
            return Vec::new();
        };

        sample_stations(
            self.s_start.clamp(0.0, road.length),
            self.s_end.clamp(0.0, road.length),
            config,
        )
        .into_iter()
        .filter_map(|s| lane_edge_position(geometry, road, self.lane_id, edge, s))
        .collect()
    }
}

/// Arclengths sampled at a fixed step, end samples pulled inward
fn sample_stations(s_start: f64, s_end: f64, config: &JunctionConfig) -> Vec<f64> {
    let step = config.sample_step();
    let epsilon = config
        .boundary_edge_epsilon
        .min((s_end - s_start) / 2.0)
        .max(0.0);

    let first = s_start + epsilon;
    let last = s_end - epsilon;

    let mut stations = vec![first];
    let mut s = s_start + step;
    while s < last {
        stations.push(s);
        s += step;
    }
    if last > first {
        stations.push(last);
    }
    stations
}

fn evaluable_road<'n, G: RoadGeometry + ?Sized>(
    network: &'n RoadNetwork,
    geometry: &G,
    road_id: RoadId,
) -> Option<&'n Road> {
    let Some(road) = network.road(road_id) else {
        warn!("Boundary segment references missing road {road_id}");
        return None;
    };
    if !has_geometry(geometry, road) {
        warn!("Road {road_id} has no geometry or zero length, boundary segment left empty");
        return None;
    }
    Some(road)
}

/// Perimeter segment: a road cross-section or a connecting-road lane strip
#[derive(Debug, Clone, PartialEq)]
pub enum BoundarySegment {
    Joint(JointBoundarySegment),
    Lane(LaneBoundarySegment),
}

impl BoundarySegment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            BoundarySegment::Joint(_) => SegmentKind::Joint,
            BoundarySegment::Lane(_) => SegmentKind::Lane,
        }
    }

    pub fn road_id(&self) -> RoadId {
        match self {
            BoundarySegment::Joint(joint) => joint.road_id,
            BoundarySegment::Lane(lane) => lane.road_id,
        }
    }

    pub fn outer_points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Vec<RoadPosition> {
        match self {
            BoundarySegment::Joint(joint) => joint.outer_points(network, geometry),
            BoundarySegment::Lane(lane) => lane.outer_points(network, geometry, config),
        }
    }

    pub fn inner_points<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Vec<RoadPosition> {
        match self {
            BoundarySegment::Joint(joint) => joint.inner_points(network, geometry),
            BoundarySegment::Lane(lane) => lane.inner_points(network, geometry, config),
        }
    }
}
