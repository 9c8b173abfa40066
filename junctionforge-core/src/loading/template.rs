//! Default junction layout: straight arms radiating from a common centre

use geo::Point;
use log::info;
use serde::{Deserialize, Serialize};

use crate::geometry::LineGeometry;
use crate::model::{ContactPoint, Junction, Lane, LaneSection, LaneType, Road, RoadLink, RoadNetwork};
use crate::{Error, JunctionId, LaneId, RoadId};

/// Lane layout of one arm, mirrored on both sides of the reference line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneLayout {
    pub driving_per_side: u32,
    pub lane_width: f64,
    /// Outermost lane on each side when set
    pub sidewalk_width: Option<f64>,
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            driving_per_side: 1,
            lane_width: 3.5,
            sidewalk_width: Some(2.0),
        }
    }
}

impl LaneLayout {
    fn lane_section(&self) -> LaneSection {
        let mut section = LaneSection::new(0.0);
        for side in [1, -1] {
            for index in 1..=self.driving_per_side {
                section.add_lane(Lane::new(
                    side * index as LaneId,
                    LaneType::Driving,
                    self.lane_width,
                ));
            }
            if let Some(width) = self.sidewalk_width {
                let id = side * (self.driving_per_side as LaneId + 1);
                section.add_lane(Lane::new(id, LaneType::Sidewalk, width));
            }
        }
        section
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemplateArm {
    /// Direction from the junction centre, degrees counter-clockwise from the x axis
    pub angle: f64,
    /// Which end of the arm touches the junction
    pub contact_point: ContactPoint,
    pub layout: LaneLayout,
}

/// Builder for a single junction fed by straight arms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialJunctionTemplate {
    pub junction_id: JunctionId,
    /// Distance from the centre to the junction end of every arm
    pub radius: f64,
    pub arm_length: f64,
    pub arms: Vec<TemplateArm>,
}

impl RadialJunctionTemplate {
    /// Arms at `angles` (degrees), each ending at the junction with the default layout
    pub fn new(angles: &[f64]) -> Self {
        Self {
            junction_id: 1,
            radius: 10.0,
            arm_length: 50.0,
            arms: angles
                .iter()
                .map(|&angle| TemplateArm {
                    angle,
                    contact_point: ContactPoint::End,
                    layout: LaneLayout::default(),
                })
                .collect(),
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_layout(mut self, layout: LaneLayout) -> Self {
        for arm in &mut self.arms {
            arm.layout = layout;
        }
        self
    }

    /// Sets which end of arm `index` touches the junction; out-of-range indices are ignored
    pub fn with_contact(mut self, index: usize, contact_point: ContactPoint) -> Self {
        if let Some(arm) = self.arms.get_mut(index) {
            arm.contact_point = contact_point;
        }
        self
    }

    /// Builds the arms as roads `1..=N` linked to the junction
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or arm length is not positive, or a lane width is not
    pub fn build(&self) -> Result<(RoadNetwork, LineGeometry, JunctionId), Error> {
        if self.radius <= 0.0 || self.arm_length <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Radius {} and arm length {} must be positive",
                self.radius, self.arm_length
            )));
        }

        let mut network = RoadNetwork::new();
        let mut geometry = LineGeometry::new();
        network.add_junction(Junction::new(self.junction_id).with_name("radial junction"))?;

        for (road_id, arm) in (1..).zip(&self.arms) {
            self.add_arm(&mut network, &mut geometry, road_id, arm)?;
        }

        info!(
            "Radial junction {} created with {} arms",
            self.junction_id,
            self.arms.len()
        );
        Ok((network, geometry, self.junction_id))
    }

    fn add_arm(
        &self,
        network: &mut RoadNetwork,
        geometry: &mut LineGeometry,
        road_id: RoadId,
        arm: &TemplateArm,
    ) -> Result<(), Error> {
        let layout = arm.layout;
        if layout.lane_width <= 0.0 || layout.sidewalk_width.is_some_and(|width| width <= 0.0) {
            return Err(Error::InvalidData(format!(
                "Arm at {}° has a non-positive lane width",
                arm.angle
            )));
        }

        let angle = arm.angle.to_radians();
        let (sin, cos) = angle.sin_cos();
        let near = Point::new(self.radius * cos, self.radius * sin);
        let far_distance = self.radius + self.arm_length;
        let far = Point::new(far_distance * cos, far_distance * sin);

        let mut road = Road::new(road_id, self.arm_length)
            .with_name(format!("arm {}°", arm.angle))
            .with_lane_section(layout.lane_section());
        match arm.contact_point {
            ContactPoint::End => {
                geometry.add_line(road_id, far, angle + std::f64::consts::PI);
                road.successor = Some(RoadLink::junction(self.junction_id));
            }
            ContactPoint::Start => {
                geometry.add_line(road_id, near, angle);
                road.predecessor = Some(RoadLink::junction(self.junction_id));
            }
        }
        network.add_road(road)
    }
}
