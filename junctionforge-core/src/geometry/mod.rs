//! Road reference-line port
//!
//! Reference-line evaluation lives outside this crate. Everything here only
//! asks the port for world positions and widths along a road.

pub mod line;

use geo::{Coord, Point};

use crate::model::{LaneEdge, Road};
use crate::{LaneId, ReferenceLineId, RoadId};

pub use line::LineGeometry;

/// World position and heading of a point on a road
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadPosition {
    pub point: Point<f64>,
    pub z: f64,
    /// Heading in radians, counter-clockwise from the x axis
    pub heading: f64,
}

impl RoadPosition {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z: 0.0,
            heading,
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    /// Unit vector along the heading
    pub fn direction(&self) -> Coord<f64> {
        Coord {
            x: self.heading.cos(),
            y: self.heading.sin(),
        }
    }

    pub fn distance_to(&self, other: &RoadPosition) -> f64 {
        (other.x() - self.x()).hypot(other.y() - self.y())
    }

    /// Same point with the heading turned by `angle` radians
    pub fn rotated(&self, angle: f64) -> Self {
        Self {
            heading: self.heading + angle,
            ..*self
        }
    }
}

/// Cumulative lane widths on both sides of the reference line
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SideWidths {
    pub left: f64,
    pub right: f64,
}

/// Read access to road reference lines
pub trait RoadGeometry {
    /// Identity of the reference line backing `road`, `None` if it has no geometry
    fn reference_line(&self, road: &Road) -> Option<ReferenceLineId>;

    /// Position at arclength `s`, offset laterally by `t` (positive to the left)
    fn position_at(&self, road: &Road, s: f64, t: f64) -> Option<RoadPosition>;

    /// Total lane width on each side at `s`
    fn widths_at(&self, road: &Road, s: f64) -> SideWidths {
        road.lane_section_at_s(s)
            .map(|section| {
                let ds = s - section.s;
                SideWidths {
                    left: section.left_width(ds),
                    right: section.right_width(ds),
                }
            })
            .unwrap_or_default()
    }
}

/// Creates reference lines for connecting roads
pub trait ReferenceLineFactory: RoadGeometry {
    /// Fits a reference line for `road` from `entry` to `exit`, returning its length
    fn fit_connecting_road(
        &mut self,
        road: RoadId,
        entry: &RoadPosition,
        exit: &RoadPosition,
    ) -> Option<f64>;

    fn remove_road(&mut self, road: RoadId);
}

/// Whether a road can be evaluated at all
pub fn has_geometry<G: RoadGeometry + ?Sized>(geometry: &G, road: &Road) -> bool {
    geometry.reference_line(road).is_some() && road.length > 0.0
}

/// World position of a lane edge at `s`
pub fn lane_edge_position<G: RoadGeometry + ?Sized>(
    geometry: &G,
    road: &Road,
    lane_id: LaneId,
    edge: LaneEdge,
    s: f64,
) -> Option<RoadPosition> {
    let section = road.lane_section_at_s(s)?;
    let t = section.edge_offset(lane_id, edge, s - section.s)?;
    geometry.position_at(road, s, t)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::model::{Lane, LaneSection, LaneType};

    #[test]
    fn edge_positions_follow_lane_offsets() {
        let mut geometry = LineGeometry::new();
        let road = Road::new(1, 10.0).with_lane_section(
            LaneSection::new(0.0)
                .with_lane(Lane::new(1, LaneType::Driving, 3.0))
                .with_lane(Lane::new(-1, LaneType::Driving, 3.0))
                .with_lane(Lane::new(-2, LaneType::Sidewalk, 2.0)),
        );
        geometry.add_line(1, Point::new(0.0, 0.0), 0.0);

        let outer = lane_edge_position(&geometry, &road, -2, LaneEdge::Outer, 4.0).unwrap();
        assert!((outer.x() - 4.0).abs() < 1e-9);
        assert!((outer.y() + 5.0).abs() < 1e-9);

        let left = lane_edge_position(&geometry, &road, 1, LaneEdge::Outer, 0.0).unwrap();
        assert!((left.y() - 3.0).abs() < 1e-9);

        let widths = geometry.widths_at(&road, 2.0);
        assert_eq!(widths, SideWidths { left: 3.0, right: 5.0 });
    }

    #[test]
    fn rotation_keeps_point() {
        let position = RoadPosition::new(1.0, 2.0, 0.0).rotated(FRAC_PI_2);

        assert_eq!(position.point, Point::new(1.0, 2.0));
        assert!(position.direction().x.abs() < 1e-12);
        assert!((position.direction().y - 1.0).abs() < 1e-12);
    }
}
