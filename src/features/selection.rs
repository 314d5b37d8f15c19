// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Univariate feature selection by ANOVA F-score.
//!
//! SRM feature vectors run to tens of thousands of columns; the ATS classifier
//! keeps only the `k` columns whose class means differ most relative to their
//! within-class spread.

use super::error::{FeatureError, Result};
use super::FeatureMatrix;

/// One-way ANOVA F statistic per column.
///
/// A column with zero within-class variance scores `+inf` if its class means
/// differ and `0` if it is constant.
pub fn f_scores(x: &FeatureMatrix, labels: &[u8]) -> Vec<f64> {
    let n = x.nrows();
    let mut classes: Vec<u8> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    let k = classes.len();
    if k < 2 || n <= k {
        return vec![0.0; x.ncols()];
    }

    (0..x.ncols())
        .map(|col| {
            let grand = (0..n).map(|i| x[(i, col)]).sum::<f64>() / n as f64;
            let mut between = 0.0;
            let mut within = 0.0;
            for &class in &classes {
                let members: Vec<f64> = (0..n)
                    .filter(|&i| labels[i] == class)
                    .map(|i| x[(i, col)])
                    .collect();
                let mean = members.iter().sum::<f64>() / members.len() as f64;
                between += members.len() as f64 * (mean - grand).powi(2);
                within += members.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            }
            let ms_between = between / (k - 1) as f64;
            let ms_within = within / (n - k) as f64;
            if ms_within > 0.0 {
                ms_between / ms_within
            } else if ms_between > 0.0 {
                f64::INFINITY
            } else {
                0.0
            }
        })
        .collect()
}

/// Keeps the `k` highest-scoring columns of a feature matrix.
#[derive(Debug, Clone)]
pub struct FeatureSelector {
    columns: Vec<usize>,
    input_dimension: usize,
}

impl FeatureSelector {
    /// Score every column against `labels` and keep the best `k`.
    ///
    /// Ties go to the lower column index. The kept columns stay in their
    /// original order. `k` at or above the column count keeps everything.
    pub fn fit(x: &FeatureMatrix, labels: &[u8], k: usize) -> Self {
        let scores = f_scores(x, labels);
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        order.truncate(k.min(scores.len()));
        order.sort_unstable();
        log::debug!("selected {} of {} feature columns", order.len(), scores.len());
        Self {
            columns: order,
            input_dimension: x.ncols(),
        }
    }

    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Project a matrix with the fitted column count onto the kept columns.
    pub fn transform(&self, x: &FeatureMatrix) -> Result<FeatureMatrix> {
        if x.ncols() != self.input_dimension {
            return Err(FeatureError::DimensionMismatch {
                expected: self.input_dimension,
                found: x.ncols(),
            });
        }
        Ok(FeatureMatrix::from_fn(x.nrows(), self.columns.len(), |i, j| {
            x[(i, self.columns[j])]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (FeatureMatrix, Vec<u8>) {
        // col 0: separates classes, col 1: noise, col 2: constant
        let x = FeatureMatrix::from_row_slice(
            6,
            3,
            &[
                0.0, 1.0, 5.0, //
                0.1, -1.0, 5.0, //
                -0.1, 0.5, 5.0, //
                3.0, -0.5, 5.0, //
                3.1, 1.0, 5.0, //
                2.9, -1.0, 5.0,
            ],
        );
        (x, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn informative_column_scores_highest() {
        let (x, y) = sample();
        let scores = f_scores(&x, &y);
        assert!(scores[0] > 100.0);
        assert!(scores[1] < 1.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn keeps_best_columns_in_original_order() {
        let (x, y) = sample();
        let sel = FeatureSelector::fit(&x, &y, 2);
        assert_eq!(sel.columns(), &[0, 1]);
        let projected = sel.transform(&x).unwrap();
        assert_eq!(projected.ncols(), 2);
        assert_eq!(projected[(3, 0)], 3.0);
    }

    #[test]
    fn oversized_k_keeps_all() {
        let (x, y) = sample();
        let sel = FeatureSelector::fit(&x, &y, 500);
        assert_eq!(sel.columns(), &[0, 1, 2]);
    }

    #[test]
    fn transform_checks_dimension() {
        let (x, y) = sample();
        let sel = FeatureSelector::fit(&x, &y, 1);
        let narrow = FeatureMatrix::zeros(2, 2);
        assert!(matches!(
            sel.transform(&narrow),
            Err(FeatureError::DimensionMismatch { expected: 3, found: 2 })
        ));
    }
}
