//! Zero-mean Gaussian prior over the LFC grid

use std::sync::Arc;

use crate::curve::Curve;
use crate::error::Result;
use crate::feature::PriorParams;
use crate::grid::Grid;

/// Label used for the prior curve in error reports and assembled output.
pub const PRIOR_LABEL: &str = "prior";

/// Evaluate the zero-mean Gaussian prior density on `grid` and
/// re-normalize by the trapezoidal rule.
///
/// The analytic Gaussian constant is deliberately not used: the grid
/// truncates the tails, and every curve in the system must share the
/// same finite-support normalization to stay comparable.
pub fn prior_curve(params: &PriorParams, grid: &Arc<Grid>) -> Result<Curve> {
    let sigma = params.sigma();
    let inv_two_var = 1.0 / (2.0 * sigma * sigma);
    let raw = grid.values().mapv(|beta| (-beta * beta * inv_two_var).exp());
    Curve::normalized(Arc::clone(grid), raw, PRIOR_LABEL)
}
