//! Straight reference lines
//!
//! Enough geometry to drive the junction algorithms without an external
//! reference-line service. Connecting roads are fitted as straight chords.

use geo::{Coord, Point};
use hashbrown::HashMap;

use crate::model::Road;
use crate::{ReferenceLineId, RoadId};

use super::{ReferenceLineFactory, RoadGeometry, RoadPosition};

#[derive(Debug, Clone, Copy, PartialEq)]
struct LineSpan {
    line: ReferenceLineId,
    origin: Coord<f64>,
    heading: f64,
    /// Arclength on the shared line where the road starts
    s_offset: f64,
}

/// Road geometry made of straight reference lines, one span per road
#[derive(Debug, Clone, Default)]
pub struct LineGeometry {
    spans: HashMap<RoadId, LineSpan>,
    next_line: ReferenceLineId,
}

impl LineGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `road` its own line starting at `start` with `heading` in radians
    pub fn add_line(&mut self, road: RoadId, start: Point<f64>, heading: f64) -> ReferenceLineId {
        let line = self.next_line;
        self.next_line += 1;
        self.spans.insert(
            road,
            LineSpan {
                line,
                origin: start.into(),
                heading,
                s_offset: 0.0,
            },
        );
        line
    }

    /// Places `road` on the line of `other`, starting `s_offset` further along it
    pub fn share_line(
        &mut self,
        road: RoadId,
        other: RoadId,
        s_offset: f64,
    ) -> Option<ReferenceLineId> {
        let base = *self.spans.get(&other)?;
        self.spans.insert(
            road,
            LineSpan {
                s_offset: base.s_offset + s_offset,
                ..base
            },
        );
        Some(base.line)
    }

    pub fn contains(&self, road: RoadId) -> bool {
        self.spans.contains_key(&road)
    }
}

impl RoadGeometry for LineGeometry {
    fn reference_line(&self, road: &Road) -> Option<ReferenceLineId> {
        self.spans.get(&road.id).map(|span| span.line)
    }

    fn position_at(&self, road: &Road, s: f64, t: f64) -> Option<RoadPosition> {
        let span = self.spans.get(&road.id)?;
        let along = span.s_offset + s;
        let (sin, cos) = span.heading.sin_cos();
        Some(RoadPosition::new(
            span.origin.x + along * cos - t * sin,
            span.origin.y + along * sin + t * cos,
            span.heading,
        ))
    }
}

impl ReferenceLineFactory for LineGeometry {
    fn fit_connecting_road(
        &mut self,
        road: RoadId,
        entry: &RoadPosition,
        exit: &RoadPosition,
    ) -> Option<f64> {
        let length = entry.distance_to(exit);
        if length <= f64::EPSILON {
            return None;
        }
        let heading = (exit.y() - entry.y()).atan2(exit.x() - entry.x());
        self.add_line(road, entry.point, heading);
        Some(length)
    }

    fn remove_road(&mut self, road: RoadId) {
        self.spans.remove(&road);
    }
}
