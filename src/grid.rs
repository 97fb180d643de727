//! Evaluation grid for the effect-size (log2 fold change) parameter

use ndarray::Array1;

use crate::error::{CurveError, Result};

/// Relative tolerance for the uniform-spacing check in `from_values`.
const SPACING_RTOL: f64 = 1e-9;

/// Immutable, strictly increasing, uniformly spaced sequence of LFC
/// values at which likelihood, prior, and posterior are evaluated.
///
/// The integration step is the spacing between the first two points;
/// uniform spacing is enforced at construction, so this is exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Array1<f64>,
    step: f64,
}

impl Grid {
    /// Build a grid of `n_points` values spanning `[lower, upper]` inclusive.
    pub fn new(lower: f64, upper: f64, n_points: usize) -> Result<Self> {
        if n_points < 2 {
            return Err(CurveError::InvalidInput {
                reason: format!("grid needs at least 2 points, got {}", n_points),
            });
        }
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(CurveError::InvalidInput {
                reason: format!("invalid grid bounds [{}, {}]", lower, upper),
            });
        }

        let step = (upper - lower) / (n_points - 1) as f64;
        let values = Array1::from_iter((0..n_points).map(|i| lower + step * i as f64));
        Ok(Self { values, step })
    }

    /// Build a grid from existing values, validating strict monotonicity
    /// and uniform spacing.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(CurveError::InvalidInput {
                reason: format!("grid needs at least 2 points, got {}", values.len()),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CurveError::InvalidInput {
                reason: "grid values must be finite".to_string(),
            });
        }

        let step = values[1] - values[0];
        if step <= 0.0 {
            return Err(CurveError::InvalidInput {
                reason: "grid values must be strictly increasing".to_string(),
            });
        }
        for w in values.windows(2) {
            let d = w[1] - w[0];
            if d <= 0.0 || (d - step).abs() > SPACING_RTOL * step.abs().max(1.0) {
                return Err(CurveError::InvalidInput {
                    reason: format!(
                        "grid spacing is not uniform: expected {:.6e}, found {:.6e}",
                        step, d
                    ),
                });
            }
        }

        Ok(Self {
            values: Array1::from(values),
            step,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Spacing between adjacent grid points.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }
}

/// Default grid bounds and resolution used for shrinkage-curve runs.
pub const DEFAULT_LOWER: f64 = -1.0;
pub const DEFAULT_UPPER: f64 = 1.5;
pub const DEFAULT_N_POINTS: usize = 500;

impl Default for Grid {
    fn default() -> Self {
        // Bounds are valid constants, construction cannot fail.
        Self::new(DEFAULT_LOWER, DEFAULT_UPPER, DEFAULT_N_POINTS).unwrap()
    }
}
