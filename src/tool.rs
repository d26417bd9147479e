//! Cutting tool description.

use std::hash::{Hash, Hasher};

use crate::error::SimulateError;

/// A round cutting bit plus the numeric tolerance of the simulation.
///
/// Both values are in the same font units as the outline coordinates.
/// A radius of exactly zero is a valid passthrough configuration: the
/// simulation then returns the normalized input unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolProfile {
    /// Bit radius, >= 0.
    pub radius: f64,
    /// Flattening deviation and intersection epsilon, > 0.
    pub tolerance: f64,
    /// Minimum area for a reported unreachable region. Smaller fragments are
    /// considered numeric noise. Defaults to `radius * tolerance`.
    pub min_detail_area: Option<f64>,
}

impl ToolProfile {
    /// A tool with the default tolerance of `radius / 100`.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            tolerance: radius / 100.0,
            min_detail_area: None,
        }
    }

    pub fn with_tolerance(radius: f64, tolerance: f64) -> Self {
        Self {
            radius,
            tolerance,
            min_detail_area: None,
        }
    }

    pub fn validate(&self) -> Result<(), SimulateError> {
        let bad = !self.radius.is_finite()
            || !self.tolerance.is_finite()
            || self.radius < 0.0
            || self.tolerance <= 0.0;
        if bad {
            return Err(SimulateError::InvalidTool {
                radius: self.radius,
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }

    pub fn min_detail_area(&self) -> f64 {
        self.min_detail_area
            .unwrap_or(self.radius * self.tolerance)
            .max(self.tolerance * self.tolerance)
    }

    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.radius.to_bits().hash(state);
        self.tolerance.to_bits().hash(state);
        self.min_detail_area.map(f64::to_bits).hash(state);
    }
}
