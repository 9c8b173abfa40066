use serde::{Deserialize, Serialize};

use crate::Error;

const DEFAULT_SAMPLE_STEP: f64 = 1.0;

/// Tolerances and sampling parameters shared by connection synthesis
/// and boundary assembly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JunctionConfig {
    /// Turns deviating at most this many degrees from the entry heading are straight
    pub straight_angle_threshold: f64,
    /// Entry and exit positions closer than this are treated as coincident
    pub coincident_distance: f64,
    /// Cross products below this magnitude are treated as collinear
    pub cross_product_epsilon: f64,
    /// Arclength tolerance when deciding whether `s` sits on a road end
    pub contact_tolerance: f64,
    /// Distance between samples along a boundary lane edge
    pub boundary_sample_step: f64,
    /// First and last boundary lane samples are pulled inward by this amount
    pub boundary_edge_epsilon: f64,
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            straight_angle_threshold: 10.0,
            coincident_distance: 1e-4,
            cross_product_epsilon: 1e-10,
            contact_tolerance: 1e-3,
            boundary_sample_step: DEFAULT_SAMPLE_STEP,
            boundary_edge_epsilon: 1e-3,
        }
    }
}

impl JunctionConfig {
    /// Boundary sample step; non-positive or non-finite values fall back to the default
    pub fn sample_step(&self) -> f64 {
        if self.boundary_sample_step.is_finite() && self.boundary_sample_step > 0.0 {
            self.boundary_sample_step
        } else {
            DEFAULT_SAMPLE_STEP
        }
    }

    /// # Errors
    ///
    /// Returns an error if the sample step is not positive or a tolerance is negative
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.boundary_sample_step.is_finite() && self.boundary_sample_step > 0.0) {
            return Err(Error::InvalidData(format!(
                "Boundary sample step must be positive, got {}",
                self.boundary_sample_step
            )));
        }
        let tolerances = [
            ("straight_angle_threshold", self.straight_angle_threshold),
            ("coincident_distance", self.coincident_distance),
            ("cross_product_epsilon", self.cross_product_epsilon),
            ("contact_tolerance", self.contact_tolerance),
            ("boundary_edge_epsilon", self.boundary_edge_epsilon),
        ];
        if let Some((name, value)) = tolerances
            .iter()
            .find(|(_, value)| value.is_nan() || *value < 0.0)
        {
            return Err(Error::InvalidData(format!(
                "{name} must not be negative, got {value}"
            )));
        }
        Ok(())
    }
}
