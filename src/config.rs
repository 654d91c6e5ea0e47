use crate::error::{HullError, Result};

/// Tuning knobs for hull construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullConfig {
    /// Overrides the tolerance derived from the input's extents. Must be
    /// finite and non-negative.
    pub tolerance: Option<f64>,
    /// Reassignment stops scanning new faces once a vertex is this many
    /// tolerances outside one of them. Must be at least 1.
    pub good_enough_factor: f64,
    /// Maximum number of vertices inserted after the initial tetrahedron.
    pub max_iterations: Option<usize>,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            tolerance: None,
            good_enough_factor: 1000.0,
            max_iterations: None,
        }
    }
}

impl HullConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_good_enough_factor(mut self, factor: f64) -> Self {
        self.good_enough_factor = factor;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Checks that no field would let input points escape the hull.
    pub fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self.tolerance {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(HullError::invalid_config(
                    "tolerance",
                    tolerance,
                    "must be finite and non-negative",
                ));
            }
        }
        if !(self.good_enough_factor >= 1.0) {
            return Err(HullError::invalid_config(
                "good_enough_factor",
                self.good_enough_factor,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Replaces every rejected field with its default.
    pub(crate) fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            tolerance: self.tolerance.filter(|t| t.is_finite() && *t >= 0.0),
            good_enough_factor: if self.good_enough_factor >= 1.0 {
                self.good_enough_factor
            } else {
                defaults.good_enough_factor
            },
            max_iterations: self.max_iterations,
        }
    }
}
