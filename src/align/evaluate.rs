// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Before/after accuracy of domain adaptation.

use nalgebra::DMatrix;

use super::aligner::{Alignment, ManifoldAligner};
use super::error::{AlignError, Result};
use crate::svm::{Classifier, Trainer};

/// Train a fresh classifier on `(x, labels)` and return the percentage of
/// target rows of `y` whose prediction matches `target_labels`.
pub fn accuracy<T: Trainer>(
    trainer: &T,
    x: &DMatrix<f64>,
    labels: &[u8],
    y: &DMatrix<f64>,
    target_labels: &[u8],
) -> Result<f64> {
    if target_labels.len() != y.nrows() {
        return Err(AlignError::ShapeMismatch {
            what: "target labels",
            expected: y.nrows(),
            found: target_labels.len(),
        });
    }
    if y.nrows() == 0 {
        return Err(AlignError::InvalidParameter("empty target set".into()));
    }
    let model = trainer.fit(x, labels)?;
    let predicted = model.predict(y)?;
    let matches = predicted.iter().zip(target_labels).filter(|(p, t)| p == t).count();
    Ok(100.0 * matches as f64 / y.nrows() as f64)
}

/// Accuracy on raw features and on the aligned embedding.
#[derive(Debug, Clone)]
pub struct AdaptationReport {
    /// Target accuracy (percent) of a classifier trained on raw source features.
    pub baseline: f64,
    /// Target accuracy (percent) after alignment.
    pub adapted: f64,
    pub alignment: Alignment,
}

impl AdaptationReport {
    pub fn improvement(&self) -> f64 {
        self.adapted - self.baseline
    }
}

/// Measure accuracy without adaptation, align, then measure again in the
/// shared space. Target labels are only used for scoring.
pub fn evaluate_adaptation<T: Trainer>(
    aligner: &ManifoldAligner<T>,
    x: &DMatrix<f64>,
    labels: &[u8],
    y: &DMatrix<f64>,
    target_labels: &[u8],
) -> Result<AdaptationReport> {
    let baseline = accuracy(aligner.trainer(), x, labels, y, target_labels)?;
    log::info!("accuracy without adaptation: {baseline:.2}%");

    let alignment = aligner.align(x, labels, y)?;
    let adapted =
        accuracy(aligner.trainer(), &alignment.source, labels, &alignment.target, target_labels)?;
    log::info!("accuracy with adaptation: {adapted:.2}%");

    Ok(AdaptationReport { baseline, adapted, alignment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::GridSearch;

    #[test]
    fn identical_domains_score_fully() {
        let x = DMatrix::from_row_slice(
            8,
            1,
            &[0.0, 0.1, 0.2, 0.3, 4.0, 4.1, 4.2, 4.3],
        );
        let labels = [0, 0, 0, 0, 1, 1, 1, 1];
        let acc = accuracy(&GridSearch::default(), &x, &labels, &x, &labels).unwrap();
        assert_eq!(acc, 100.0);
    }

    #[test]
    fn target_label_count_checked() {
        let x = DMatrix::zeros(4, 1);
        let err = accuracy(&GridSearch::default(), &x, &[0, 0, 1, 1], &x, &[0, 1]).unwrap_err();
        assert_eq!(
            err,
            AlignError::ShapeMismatch { what: "target labels", expected: 4, found: 2 }
        );
    }
}
