// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Classify the B set with a model trained on A (cover) against C (stego).

use std::path::Path;

use nalgebra::DMatrix;

use super::error::{AtsError, Result};
use crate::features::labels::read_labels;
use crate::features::selection::FeatureSelector;
use crate::features::srm::read_srm_abc;
use crate::features::{COVER, STEGO};
use crate::svm::{Classifier, Trainer};

/// Outcome of [`classify_abc`].
#[derive(Debug, Clone, PartialEq)]
pub enum AbcVerdict {
    /// Fraction of B images whose prediction matches the labels file.
    Accuracy(f64),
    /// Predicted label per B image, in set order.
    Predictions(Vec<(String, u8)>),
}

/// Train on `A ∪ C` after keeping the `k` most discriminative features and
/// predict every image of `B`.
///
/// With a readable `labels` file the predictions are scored against it;
/// without one (or if the path does not exist) they are returned as is.
pub fn classify_abc<T: Trainer>(
    trainer: &T,
    a: &Path,
    b: &Path,
    c: &Path,
    labels: Option<&Path>,
    k: usize,
) -> Result<AbcVerdict> {
    let abc = read_srm_abc(a, b, c)?;
    let x = stack(&abc.a, &abc.c);
    let y: Vec<u8> = std::iter::repeat(COVER)
        .take(abc.a.nrows())
        .chain(std::iter::repeat(STEGO).take(abc.c.nrows()))
        .collect();

    let selector = FeatureSelector::fit(&x, &y, k);
    let x = selector.transform(&x)?;
    let z = selector.transform(&abc.b)?;
    log::info!(
        "training on {} A + {} C samples, {} features; classifying {} B samples",
        abc.a.nrows(),
        abc.c.nrows(),
        x.ncols(),
        z.nrows()
    );

    let model = trainer.fit(&x, &y)?;
    let predicted = model.predict(&z)?;

    match labels {
        Some(path) if path.exists() => {
            let truth = read_labels(path)?;
            let mut ok = 0usize;
            for (name, &p) in abc.names.iter().zip(&predicted) {
                let label = truth
                    .get(name)
                    .ok_or_else(|| AtsError::MissingLabel { name: name.clone() })?;
                if *label == p {
                    ok += 1;
                }
            }
            Ok(AbcVerdict::Accuracy(ok as f64 / predicted.len() as f64))
        }
        other => {
            if let Some(path) = other {
                log::warn!("labels file {} not found, listing predictions", path.display());
            }
            Ok(AbcVerdict::Predictions(abc.names.into_iter().zip(predicted).collect()))
        }
    }
}

/// Rows of `top` followed by rows of `bottom`. Column counts must match.
fn stack(top: &DMatrix<f64>, bottom: &DMatrix<f64>) -> DMatrix<f64> {
    let n = top.nrows();
    DMatrix::from_fn(n + bottom.nrows(), top.ncols(), |i, j| {
        if i < n {
            top[(i, j)]
        } else {
            bottom[(i - n, j)]
        }
    })
}
