//! Consistency validation between grid-derived and model-fit estimates
//!
//! The grid mode of the likelihood curve must agree with the model fit's
//! unshrunken effect size, and the grid mode of the posterior with its
//! shrunken estimate. Disagreement beyond tolerance signals
//! grid-resolution or model-specification drift between the two
//! estimation paths and is fatal for the run.

use std::fmt;

use crate::error::{CurveError, Result};

/// Which of the two point estimates is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorKind {
    /// Mode of the likelihood curve vs the unshrunken model estimate.
    Mle,
    /// Mode of the posterior curve vs the shrunken model estimate.
    Map,
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorKind::Mle => write!(f, "MLE"),
            EstimatorKind::Map => write!(f, "MAP"),
        }
    }
}

/// Agreement tolerances for the two estimator kinds.
///
/// The MAP tolerance is looser: the posterior mode on a coarse grid is a
/// blunter estimate than the optimizer-based shrinkage estimate.
#[derive(Debug, Clone, Copy)]
pub struct AgreementTolerances {
    pub mle: f64,
    pub map: f64,
}

impl Default for AgreementTolerances {
    fn default() -> Self {
        Self { mle: 0.01, map: 0.07 }
    }
}

impl AgreementTolerances {
    fn for_kind(&self, kind: EstimatorKind) -> f64 {
        match kind {
            EstimatorKind::Mle => self.mle,
            EstimatorKind::Map => self.map,
        }
    }
}

/// External point estimates for one feature, from the model fit.
#[derive(Debug, Clone)]
pub struct ModelEstimates {
    pub feature_id: String,
    /// Unshrunken (MLE) effect size.
    pub mle: f64,
    /// Shrunken (MAP) effect size.
    pub map: f64,
}

/// Grid-derived mode estimates for one feature.
#[derive(Debug, Clone)]
pub struct GridEstimates {
    pub feature_id: String,
    /// Mode of the likelihood curve.
    pub mle: f64,
    /// Mode of the posterior curve.
    pub map: f64,
}

/// Outcome of one feature / estimator-kind comparison.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub feature_id: String,
    pub estimator: EstimatorKind,
    pub grid_estimate: f64,
    pub model_estimate: f64,
    pub discrepancy: f64,
    pub passed: bool,
}

/// Compare grid-derived estimates against the model fit's point
/// estimates for every feature, strict `<` against the tolerance.
///
/// Returns all per-feature, per-kind results on success; fails with
/// `ToleranceExceeded` on the first violation, in input order. Grid and
/// model estimates are matched by feature id; a feature present on one
/// side only is `InvalidInput`.
pub fn validate_agreement(
    grid_estimates: &[GridEstimates],
    model_estimates: &[ModelEstimates],
    tolerances: &AgreementTolerances,
) -> Result<Vec<ValidationResult>> {
    let mut results = Vec::with_capacity(grid_estimates.len() * 2);

    for grid_est in grid_estimates {
        let model_est = model_estimates
            .iter()
            .find(|m| m.feature_id == grid_est.feature_id)
            .ok_or_else(|| CurveError::InvalidInput {
                reason: format!(
                    "no model estimates supplied for feature '{}'",
                    grid_est.feature_id
                ),
            })?;

        for (kind, grid_value, model_value) in [
            (EstimatorKind::Mle, grid_est.mle, model_est.mle),
            (EstimatorKind::Map, grid_est.map, model_est.map),
        ] {
            let tolerance = tolerances.for_kind(kind);
            let discrepancy = (grid_value - model_value).abs();
            let passed = discrepancy < tolerance;

            if !passed {
                return Err(CurveError::ToleranceExceeded {
                    feature_id: grid_est.feature_id.clone(),
                    estimator: kind.to_string(),
                    discrepancy,
                    tolerance,
                });
            }

            log::debug!(
                "feature '{}' {} agreement: grid {:.4} vs model {:.4} (|d| = {:.4} < {})",
                grid_est.feature_id,
                kind,
                grid_value,
                model_value,
                discrepancy,
                tolerance
            );

            results.push(ValidationResult {
                feature_id: grid_est.feature_id.clone(),
                estimator: kind,
                grid_estimate: grid_value,
                model_estimate: model_value,
                discrepancy,
                passed,
            });
        }
    }

    Ok(results)
}
