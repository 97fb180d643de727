//! Normalized density curves over the evaluation grid
//!
//! Every curve in the system (prior, likelihood, posterior) is
//! normalized by the same discrete trapezoidal rule, so the three stay
//! directly comparable on the same finite support despite grid
//! truncation.

use std::sync::Arc;

use ndarray::Array1;

use crate::error::{CurveError, Result};
use crate::grid::Grid;

/// A non-negative density sampled on a [`Grid`], with trapezoidal
/// integral 1.
#[derive(Debug, Clone)]
pub struct Curve {
    grid: Arc<Grid>,
    densities: Array1<f64>,
}

/// The single grid point attaining a curve's maximum density.
///
/// Ties resolve to the lowest beta value, so the mode is deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePoint {
    pub beta: f64,
    pub density: f64,
    pub index: usize,
}

impl Curve {
    /// Normalize raw non-negative values over `grid` so the trapezoidal
    /// integral equals 1. `label` identifies the originating feature (or
    /// "prior") in error reports.
    ///
    /// Zero or non-finite total mass is reported as `NumericalInstability`
    /// rather than silently divided through.
    pub fn normalized(grid: Arc<Grid>, raw: Array1<f64>, label: &str) -> Result<Self> {
        if raw.len() != grid.len() {
            return Err(CurveError::GridMismatch {
                reason: format!(
                    "curve has {} values but grid has {} points",
                    raw.len(),
                    grid.len()
                ),
            });
        }
        if raw.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return Err(CurveError::NumericalInstability {
                feature_id: label.to_string(),
                details: "curve contains negative or non-finite values".to_string(),
            });
        }

        let mass = trapezoid_mass(&raw, grid.step());
        if !mass.is_finite() || mass <= 0.0 {
            return Err(CurveError::NumericalInstability {
                feature_id: label.to_string(),
                details: format!("curve mass {} is not normalizable", mass),
            });
        }

        Ok(Self {
            grid,
            densities: raw / mass,
        })
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn densities(&self) -> &Array1<f64> {
        &self.densities
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    /// Trapezoidal integral of the curve over its grid (1 up to
    /// floating error for any curve built through `normalized`).
    pub fn trapezoid_integral(&self) -> f64 {
        trapezoid_mass(&self.densities, self.grid.step())
    }

    /// Locate the mode by ascending scan; the first index attaining the
    /// global maximum wins, so equal maxima resolve to the lower beta.
    pub fn mode(&self) -> ModePoint {
        let mut index = 0;
        let mut best = self.densities[0];
        for (i, &d) in self.densities.iter().enumerate().skip(1) {
            if d > best {
                best = d;
                index = i;
            }
        }
        ModePoint {
            beta: self.grid.values()[index],
            density: best,
            index,
        }
    }

    /// Masking view for rendering: the density at the mode index, `None`
    /// everywhere else. The stored densities are untouched; this replaces
    /// the numeric missing-value sentinel some plotting pipelines use.
    pub fn mode_mask(&self) -> Vec<Option<f64>> {
        let mode = self.mode();
        let mut mask = vec![None; self.len()];
        mask[mode.index] = Some(mode.density);
        mask
    }
}

/// Trapezoidal integral of `values` on a uniform grid with spacing `step`.
fn trapezoid_mass(values: &Array1<f64>, step: f64) -> f64 {
    let n = values.len();
    let sum: f64 = values.sum();
    step * (sum - 0.5 * (values[0] + values[n - 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid4() -> Arc<Grid> {
        Arc::new(Grid::from_values(vec![0.0, 1.0, 2.0, 3.0]).unwrap())
    }

    #[test]
    fn test_normalized_integral_is_one() {
        let c = Curve::normalized(grid4(), array![1.0, 3.0, 2.0, 1.0], "t").unwrap();
        assert!((c.trapezoid_integral() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_mass_is_instability() {
        let err = Curve::normalized(grid4(), array![0.0, 0.0, 0.0, 0.0], "t");
        assert!(matches!(err, Err(CurveError::NumericalInstability { .. })));
    }

    #[test]
    fn test_negative_values_rejected() {
        let err = Curve::normalized(grid4(), array![1.0, -1.0, 1.0, 1.0], "t");
        assert!(matches!(err, Err(CurveError::NumericalInstability { .. })));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Curve::normalized(grid4(), array![1.0, 2.0], "t");
        assert!(matches!(err, Err(CurveError::GridMismatch { .. })));
    }

    #[test]
    fn test_mode_tie_breaks_low_beta() {
        let c = Curve::normalized(grid4(), array![1.0, 5.0, 5.0, 1.0], "t").unwrap();
        let m = c.mode();
        assert_eq!(m.index, 1);
        assert!((m.beta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mode_mask_single_point() {
        let c = Curve::normalized(grid4(), array![1.0, 2.0, 7.0, 1.0], "t").unwrap();
        let mask = c.mode_mask();
        assert_eq!(mask.iter().filter(|p| p.is_some()).count(), 1);
        assert!(mask[2].is_some());
        assert!((mask[2].unwrap() - c.densities()[2]).abs() < 1e-12);
    }
}
