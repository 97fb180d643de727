//! lfc_curves: empirical-Bayes LFC shrinkage curves over a discretized grid
//!
//! For a small set of selected features, this crate computes the
//! normalized negative-binomial likelihood of the log2 fold change over
//! a finite grid, combines it with an externally estimated zero-mean
//! Gaussian prior into a normalized posterior, extracts the grid modes
//! (MLE from the likelihood, MAP from the posterior), cross-checks them
//! against the model fit's own point estimates, and flattens everything
//! into one tagged dataset for rendering.
//!
//! Model fitting (size factors, dispersions, intercepts, prior sigma)
//! and plotting live outside this crate; all inputs arrive in memory.
//!
//! # Example
//!
//! ```ignore
//! use lfc_curves::prelude::*;
//!
//! let features = vec![/* Feature::new(..) per selected gene */];
//! let prior = PriorParams::new(0.3)?;
//! let estimates = vec![/* ModelEstimates per feature, from the fit */];
//!
//! let run = run_shrinkage_curves(&features, &prior, &estimates, &CurveParams::default())?;
//! render(run.rows);
//! ```

pub mod assemble;
pub mod curve;
pub mod error;
pub mod feature;
pub mod grid;
pub mod likelihood;
pub mod posterior;
pub mod prior;
pub mod validate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assemble::{assemble_curves, CurveKind, CurveRow, FeatureCurves};
    pub use crate::curve::{Curve, ModePoint};
    pub use crate::error::{CurveError, Result};
    pub use crate::feature::{Feature, PriorParams};
    pub use crate::grid::Grid;
    pub use crate::likelihood::likelihood_curve;
    pub use crate::posterior::posterior_curve;
    pub use crate::prior::prior_curve;
    pub use crate::validate::{
        validate_agreement, AgreementTolerances, EstimatorKind, GridEstimates, ModelEstimates,
        ValidationResult,
    };
    pub use crate::{run_shrinkage_curves, CurveParams, ShrinkageCurveRun};
}

use std::sync::Arc;

use rayon::prelude::*;

use crate::grid::{DEFAULT_LOWER, DEFAULT_N_POINTS, DEFAULT_UPPER};
use prelude::*;

/// Parameters for a shrinkage-curve run.
#[derive(Debug, Clone)]
pub struct CurveParams {
    /// Lower bound of the LFC grid (default: -1.0)
    pub grid_lower: f64,
    /// Upper bound of the LFC grid (default: 1.5)
    pub grid_upper: f64,
    /// Number of grid points (default: 500)
    pub grid_points: usize,
    /// Grid-vs-model agreement tolerances (default: MLE 0.01, MAP 0.07)
    pub tolerances: AgreementTolerances,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            grid_lower: DEFAULT_LOWER,
            grid_upper: DEFAULT_UPPER,
            grid_points: DEFAULT_N_POINTS,
            tolerances: AgreementTolerances::default(),
        }
    }
}

/// Output of [`run_shrinkage_curves`].
#[derive(Debug)]
pub struct ShrinkageCurveRun {
    /// Assembled dataset for the rendering collaborator.
    pub rows: Vec<CurveRow>,
    /// Per-feature, per-estimator agreement results (all passed).
    pub validation: Vec<ValidationResult>,
    /// Features whose curve computation failed, with the cause. These
    /// are excluded from `rows` and `validation`; the computation is
    /// deterministic, so failures are reported rather than retried.
    pub failures: Vec<(String, CurveError)>,
}

/// Run the complete shrinkage-curve pipeline.
///
/// Per-feature curves are computed in parallel and independently: an
/// `InvalidInput` or `NumericalInstability` failure aborts only that
/// feature and lands in `failures`. The agreement check against
/// `estimates` runs after all features complete and is fatal for the
/// whole run on violation, before any output reaches the caller.
pub fn run_shrinkage_curves(
    features: &[Feature],
    prior_params: &PriorParams,
    estimates: &[ModelEstimates],
    params: &CurveParams,
) -> Result<ShrinkageCurveRun> {
    let grid = Arc::new(Grid::new(
        params.grid_lower,
        params.grid_upper,
        params.grid_points,
    )?);
    let prior = prior_curve(prior_params, &grid)?;

    log::info!(
        "computing shrinkage curves for {} features on a {}-point grid [{}, {}], sigma = {}",
        features.len(),
        grid.len(),
        params.grid_lower,
        params.grid_upper,
        prior_params.sigma()
    );

    // Step 1: per-feature likelihood and posterior, independently.
    let outcomes: Vec<(String, Result<FeatureCurves>)> = features
        .par_iter()
        .map(|feature| {
            let result = likelihood_curve(feature, &grid).and_then(|lik| {
                let post = posterior_curve(&lik, &prior, feature.id())?;
                Ok(FeatureCurves {
                    feature_id: feature.id().to_string(),
                    likelihood: lik,
                    posterior: post,
                })
            });
            (feature.id().to_string(), result)
        })
        .collect();

    let mut computed = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (feature_id, outcome) in outcomes {
        match outcome {
            Ok(fc) => computed.push(fc),
            Err(e) => {
                log::warn!("feature '{}' failed: {}", feature_id, e);
                failures.push((feature_id, e));
            }
        }
    }

    // Step 2: grid modes vs model point estimates; fatal on violation.
    let grid_estimates: Vec<GridEstimates> = computed
        .iter()
        .map(|fc| GridEstimates {
            feature_id: fc.feature_id.clone(),
            mle: fc.likelihood.mode().beta,
            map: fc.posterior.mode().beta,
        })
        .collect();
    let validation = validate_agreement(&grid_estimates, estimates, &params.tolerances)?;

    // Step 3: flatten for rendering.
    let rows = assemble_curves(&prior, &computed);

    Ok(ShrinkageCurveRun {
        rows,
        validation,
        failures,
    })
}
