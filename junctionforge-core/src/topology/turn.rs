use std::f64::consts::PI;
use std::fmt;

use geo::Point;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::JunctionConfig;
use crate::geometry::RoadGeometry;
use crate::model::{ContactPoint, RoadCoord};

/// Geometric relation between the incoming and outgoing road of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnType {
    Straight,
    Left,
    Right,
}

impl fmt::Display for TurnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnType::Straight => "straight",
            TurnType::Left => "left",
            TurnType::Right => "right",
        };
        f.write_str(name)
    }
}

/// Classifies how a road end relates to another road end across a junction
pub struct TurnClassifier<'g, G: ?Sized> {
    geometry: &'g G,
    config: JunctionConfig,
}

impl<'g, G: RoadGeometry + ?Sized> TurnClassifier<'g, G> {
    pub fn new(geometry: &'g G, config: JunctionConfig) -> Self {
        Self { geometry, config }
    }

    pub fn classify(&self, entry: &RoadCoord<'_>, exit: &RoadCoord<'_>) -> TurnType {
        let entry_line = self.geometry.reference_line(entry.road);
        if entry_line.is_some() && entry_line == self.geometry.reference_line(exit.road) {
            return TurnType::Straight;
        }

        let (Some(entry_position), Some(exit_position)) = (
            self.geometry.position_at(entry.road, entry.s, entry.t),
            self.geometry.position_at(exit.road, exit.s, exit.t),
        ) else {
            warn!(
                "Cannot classify turn from road {} to road {}: missing geometry",
                entry.road.id, exit.road.id
            );
            return TurnType::Straight;
        };

        // Lanes entering at the start of a road travel against its reference line
        let heading = match entry.contact(self.config.contact_tolerance) {
            Some(ContactPoint::Start) => entry_position.heading + PI,
            _ => entry_position.heading,
        };

        classify_direction(
            entry_position.point,
            heading,
            exit_position.point,
            &self.config,
        )
    }
}

/// Turn from `from` travelling along `heading` towards `to`
pub fn classify_direction(
    from: Point<f64>,
    heading: f64,
    to: Point<f64>,
    config: &JunctionConfig,
) -> TurnType {
    let delta = to - from;
    let distance = delta.x().hypot(delta.y());
    if distance < config.coincident_distance {
        return TurnType::Straight;
    }

    let (heading_y, heading_x) = heading.sin_cos();
    let to_x = delta.x() / distance;
    let to_y = delta.y() / distance;

    let dot = (heading_x * to_x + heading_y * to_y).clamp(-1.0, 1.0);
    let angle = dot.acos().to_degrees();
    let cross_z = heading_x * to_y - heading_y * to_x;

    if angle <= config.straight_angle_threshold || cross_z.abs() < config.cross_product_epsilon {
        TurnType::Straight
    } else if cross_z > 0.0 {
        TurnType::Left
    } else {
        TurnType::Right
    }
}
