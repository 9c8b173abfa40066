//! Junction perimeter built from road cross-sections and corner lane strips

mod assembler;
mod segment;

pub use assembler::{BoundaryAssembler, BoundaryKind};
pub use segment::{BoundarySegment, JointBoundarySegment, LaneBoundarySegment, SegmentKind};

use geo::{LineString, Polygon};
use itertools::Itertools;

use crate::config::JunctionConfig;
use crate::geometry::{RoadGeometry, RoadPosition};
use crate::model::RoadNetwork;

/// Points closer than this are merged when flattening the ring
const DUPLICATE_POINT_DISTANCE: f64 = 1e-6;

/// Ordered ring of boundary segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JunctionBoundary {
    segments: Vec<BoundarySegment>,
}

impl JunctionBoundary {
    pub fn new(segments: Vec<BoundarySegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[BoundarySegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_kinds(&self) -> Vec<SegmentKind> {
        self.segments.iter().map(BoundarySegment::kind).collect()
    }

    /// Outer-edge points of every segment in ring order
    pub fn outer_positions<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Vec<RoadPosition> {
        flatten(
            self.segments
                .iter()
                .flat_map(|segment| segment.outer_points(network, geometry, config)),
        )
    }

    /// Inner-edge points of every segment in ring order
    pub fn inner_positions<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Vec<RoadPosition> {
        flatten(
            self.segments
                .iter()
                .flat_map(|segment| segment.inner_points(network, geometry, config)),
        )
    }

    /// The outer ring as a closed polygon, `None` when fewer than three points remain
    pub fn to_polygon<G: RoadGeometry + ?Sized>(
        &self,
        network: &RoadNetwork,
        geometry: &G,
        config: &JunctionConfig,
    ) -> Option<Polygon<f64>> {
        let positions = self.outer_positions(network, geometry, config);
        if positions.len() < 3 {
            return None;
        }
        let exterior: LineString<f64> = positions
            .iter()
            .map(|position| position.point.0)
            .collect();
        Some(Polygon::new(exterior, Vec::new()))
    }
}

fn flatten(points: impl Iterator<Item = RoadPosition>) -> Vec<RoadPosition> {
    points
        .dedup_by(|a, b| a.distance_to(b) < DUPLICATE_POINT_DISTANCE)
        .collect()
}
