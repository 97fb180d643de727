//! Posterior engine: likelihood x prior on a shared grid

use std::sync::Arc;

use crate::curve::Curve;
use crate::error::{CurveError, Result};

/// Combine a likelihood curve and a prior curve into the normalized
/// posterior. `label` identifies the feature in error reports.
///
/// The two curves must be sampled on the identical grid (same length and
/// values); no interpolation or truncation is performed.
pub fn posterior_curve(likelihood: &Curve, prior: &Curve, label: &str) -> Result<Curve> {
    let lg = likelihood.grid();
    let pg = prior.grid();

    if lg.len() != pg.len() {
        return Err(CurveError::GridMismatch {
            reason: format!(
                "likelihood grid has {} points, prior grid has {}",
                lg.len(),
                pg.len()
            ),
        });
    }
    if lg.values() != pg.values() {
        return Err(CurveError::GridMismatch {
            reason: "likelihood and prior grids differ in values".to_string(),
        });
    }

    let raw = likelihood.densities() * prior.densities();
    Curve::normalized(Arc::clone(lg), raw, label)
}
