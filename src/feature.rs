//! Per-feature input bundle and shared prior parameters
//!
//! Both structures are read-only snapshots supplied by the external
//! model-fit collaborator; nothing in this crate mutates them.

use ndarray::Array1;

use crate::error::{CurveError, Result};

/// Immutable per-feature inputs from the upstream model fit.
///
/// Counts are stored as `f64` following the count-matrix convention of
/// the fitting pipeline, but must hold non-negative integer values.
#[derive(Debug, Clone)]
pub struct Feature {
    id: String,
    counts: Array1<f64>,
    size_factors: Array1<f64>,
    condition: Array1<f64>,
    dispersion: f64,
    intercept: f64,
}

impl Feature {
    pub fn new(
        id: impl Into<String>,
        counts: Array1<f64>,
        size_factors: Array1<f64>,
        condition: Array1<f64>,
        dispersion: f64,
        intercept: f64,
    ) -> Result<Self> {
        let id = id.into();
        let n = counts.len();

        if n == 0 {
            return Err(CurveError::InvalidInput {
                reason: format!("feature '{}' has no samples", id),
            });
        }
        if size_factors.len() != n || condition.len() != n {
            return Err(CurveError::InvalidInput {
                reason: format!(
                    "feature '{}': counts ({}), size factors ({}), and condition ({}) \
                     must have equal length",
                    id,
                    n,
                    size_factors.len(),
                    condition.len()
                ),
            });
        }
        if counts.iter().any(|&k| !k.is_finite() || k < 0.0 || k.fract() != 0.0) {
            return Err(CurveError::InvalidInput {
                reason: format!("feature '{}': counts must be non-negative integers", id),
            });
        }
        if size_factors.iter().any(|&sf| !sf.is_finite() || sf <= 0.0) {
            return Err(CurveError::InvalidInput {
                reason: format!("feature '{}': size factors must be positive", id),
            });
        }
        if condition.iter().any(|&x| x != 0.0 && x != 1.0) {
            return Err(CurveError::InvalidInput {
                reason: format!("feature '{}': condition indicator must be 0 or 1", id),
            });
        }
        if !dispersion.is_finite() || dispersion <= 0.0 {
            return Err(CurveError::InvalidInput {
                reason: format!("feature '{}': dispersion must be positive, got {}", id, dispersion),
            });
        }
        if !intercept.is_finite() {
            return Err(CurveError::InvalidInput {
                reason: format!("feature '{}': intercept must be finite", id),
            });
        }

        Ok(Self {
            id,
            counts,
            size_factors,
            condition,
            dispersion,
            intercept,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn n_samples(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &Array1<f64> {
        &self.counts
    }

    pub fn size_factors(&self) -> &Array1<f64> {
        &self.size_factors
    }

    pub fn condition(&self) -> &Array1<f64> {
        &self.condition
    }

    pub fn dispersion(&self) -> f64 {
        self.dispersion
    }

    /// Intercept of the log2-scale linear predictor.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Zero-mean Gaussian prior on the LFC, shared across all features in a
/// run. Sigma is estimated upstream from the full dataset.
#[derive(Debug, Clone, Copy)]
pub struct PriorParams {
    sigma: f64,
}

impl PriorParams {
    pub fn new(sigma: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(CurveError::InvalidInput {
                reason: format!("prior sigma must be positive, got {}", sigma),
            });
        }
        Ok(Self { sigma })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}
