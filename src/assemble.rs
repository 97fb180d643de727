//! Curve assembler: one tagged dataset for the rendering collaborator
//!
//! Flattens the prior curve and every feature's likelihood and posterior
//! curves into ordered rows. No statistical computation happens here.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::prior::PRIOR_LABEL;

/// Which curve a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Prior,
    Likelihood,
    Posterior,
}

/// One point of one curve in the assembled dataset.
///
/// `feature_id` is `None` for the dataset-wide prior curve. The mode is
/// flagged with an explicit boolean rather than a sentinel density, so
/// every row keeps its true density value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRow {
    pub feature_id: Option<String>,
    pub beta: f64,
    pub density: f64,
    pub kind: CurveKind,
    pub is_mode_point: bool,
}

/// The computed curves for one feature, ready for assembly.
#[derive(Debug, Clone)]
pub struct FeatureCurves {
    pub feature_id: String,
    pub likelihood: Curve,
    pub posterior: Curve,
}

/// Flatten the prior and all per-feature curves into one row dataset,
/// preserving beta order within each (feature, kind) group and marking
/// exactly one mode point per curve.
pub fn assemble_curves(prior: &Curve, features: &[FeatureCurves]) -> Vec<CurveRow> {
    let per_feature_rows = 2 * features.iter().map(|f| f.likelihood.len()).sum::<usize>();
    let mut rows = Vec::with_capacity(prior.len() + per_feature_rows);

    push_curve(&mut rows, None, CurveKind::Prior, prior);
    for fc in features {
        let id = Some(fc.feature_id.clone());
        push_curve(&mut rows, id.clone(), CurveKind::Likelihood, &fc.likelihood);
        push_curve(&mut rows, id, CurveKind::Posterior, &fc.posterior);
    }

    log::info!(
        "assembled {} rows ({} features + {})",
        rows.len(),
        features.len(),
        PRIOR_LABEL
    );
    rows
}

fn push_curve(rows: &mut Vec<CurveRow>, feature_id: Option<String>, kind: CurveKind, curve: &Curve) {
    let mask = curve.mode_mask();
    for ((&beta, &density), mode) in curve
        .grid()
        .values()
        .iter()
        .zip(curve.densities().iter())
        .zip(mask)
    {
        rows.push(CurveRow {
            feature_id: feature_id.clone(),
            beta,
            density,
            kind,
            is_mode_point: mode.is_some(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::PriorParams;
    use crate::grid::Grid;
    use crate::prior::prior_curve;
    use ndarray::Array1;
    use std::sync::Arc;

    fn setup() -> (Curve, Vec<FeatureCurves>) {
        let grid = Arc::new(Grid::new(-1.0, 1.0, 21).unwrap());
        let prior = prior_curve(&PriorParams::new(0.3).unwrap(), &grid).unwrap();
        let raw: Array1<f64> = grid.values().mapv(|b| (-(b - 0.5) * (b - 0.5)).exp());
        let lik = Curve::normalized(Arc::clone(&grid), raw.clone(), "g1").unwrap();
        let post = Curve::normalized(Arc::clone(&grid), raw, "g1").unwrap();
        let features = vec![FeatureCurves {
            feature_id: "g1".to_string(),
            likelihood: lik,
            posterior: post,
        }];
        (prior, features)
    }

    #[test]
    fn test_row_count_and_grouping() {
        let (prior, features) = setup();
        let rows = assemble_curves(&prior, &features);
        assert_eq!(rows.len(), 3 * 21);

        assert!(rows[..21].iter().all(|r| r.kind == CurveKind::Prior && r.feature_id.is_none()));
        assert!(rows[21..42]
            .iter()
            .all(|r| r.kind == CurveKind::Likelihood && r.feature_id.as_deref() == Some("g1")));
        assert!(rows[42..]
            .iter()
            .all(|r| r.kind == CurveKind::Posterior && r.feature_id.as_deref() == Some("g1")));
    }

    #[test]
    fn test_beta_ordered_within_groups() {
        let (prior, features) = setup();
        let rows = assemble_curves(&prior, &features);
        for group in rows.chunks(21) {
            for w in group.windows(2) {
                assert!(w[0].beta < w[1].beta);
            }
        }
    }

    #[test]
    fn test_one_mode_point_per_curve() {
        let (prior, features) = setup();
        let rows = assemble_curves(&prior, &features);
        for group in rows.chunks(21) {
            assert_eq!(group.iter().filter(|r| r.is_mode_point).count(), 1);
        }
    }

    #[test]
    fn test_rows_serialize() {
        let (prior, features) = setup();
        let rows = assemble_curves(&prior, &features);
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert!(json.contains("\"kind\":\"prior\""));
        assert!(json.contains("\"feature_id\":null"));
        let back: CurveRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, CurveKind::Prior);
    }
}
