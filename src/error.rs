//! Error types for lfc_curves

use thiserror::Error;

/// Main error type for shrinkage-curve operations
#[derive(Error, Debug)]
pub enum CurveError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Grid mismatch: {reason}")]
    GridMismatch { reason: String },

    #[error("Numerical instability for feature {feature_id}: {details}")]
    NumericalInstability { feature_id: String, details: String },

    #[error(
        "Tolerance exceeded for feature {feature_id} ({estimator}): \
         discrepancy {discrepancy:.6} >= tolerance {tolerance}"
    )]
    ToleranceExceeded {
        feature_id: String,
        estimator: String,
        discrepancy: f64,
        tolerance: f64,
    },
}

/// Result type alias for shrinkage-curve operations
pub type Result<T> = std::result::Result<T, CurveError>;
