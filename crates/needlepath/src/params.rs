//! Parameters for visibility and accessibility analysis.

use needlepath_math::Tolerance;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Analysis parameters.
///
/// Distances are in mesh units (millimetres for typical imaging data).
///
/// # Example
///
/// ```
/// use needlepath::AnalysisParams;
///
/// let params = AnalysisParams::default();
/// assert!((params.tolerance - 0.001).abs() < 1e-12);
/// assert!((params.cutoff - 130.0).abs() < 1e-12);
///
/// let shallow = AnalysisParams::default().cutoff(80.0);
/// assert!(shallow.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Slack for segment-surface incidence.
    pub tolerance: f64,
    /// Entry points at or beyond this distance from the target earn no score.
    pub cutoff: f64,
    /// Offset added to accessible distances in the per-cell scalar field so
    /// they stay clear of the inaccessible sentinel.
    pub visualization_bias: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DEFAULT.linear,
            cutoff: 130.0,
            visualization_bias: 101.0,
        }
    }
}

impl AnalysisParams {
    /// Set the intersection tolerance.
    #[must_use]
    pub const fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the cutoff distance.
    #[must_use]
    pub const fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the visualization bias.
    #[must_use]
    pub const fn visualization_bias(mut self, bias: f64) -> Self {
        self.visualization_bias = bias;
        self
    }

    /// Tolerance as a [`Tolerance`] value.
    pub fn linear_tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance)
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnalysisError::InvalidParams(
                "tolerance must be positive and finite".into(),
            ));
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(AnalysisError::InvalidParams(
                "cutoff must be positive and finite".into(),
            ));
        }
        if !(self.visualization_bias.is_finite() && self.visualization_bias > 0.0) {
            return Err(AnalysisError::InvalidParams(
                "visualization_bias must be positive and finite".into(),
            ));
        }
        Ok(())
    }
}
