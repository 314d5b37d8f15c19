// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cross-validated hyperparameter search.
//!
//! Every `(C, gamma, kernel)` candidate is scored by mean accuracy over
//! stratified folds; the first candidate with the strictly highest score wins
//! and is refitted on the full training set. Candidates are enumerated with
//! `C` outermost, then gamma, then kernel, and that order decides ties.
//!
//! Folds are deterministic: within each class, samples are split in index
//! order into contiguous chunks, earlier folds taking the remainder.
//!
//! With the `parallel` feature, candidates are scored concurrently. The
//! winner does not depend on scheduling.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::error::{Result, SvmError};
use super::{matrix_rows, validate, KernelKind, SvmModel, SvmParams, Trainer};
use super::DEFAULT_TOLERANCE;
use crate::features::{COVER, STEGO};

/// Default gamma grid. Duplicates are scored twice and never displace an
/// earlier equal score.
pub const DEFAULT_GAMMAS: [f64; 8] = [1e3, 1e-2, 1e-1, 1.0, 1e-1, 1e-2, 1e-3, 1e-4];
/// Default C grid.
pub const DEFAULT_COSTS: [f64; 6] = [0.25, 0.5, 1.0, 10.0, 100.0, 10000.0];
/// Default number of cross-validation folds.
pub const DEFAULT_FOLDS: usize = 5;

/// Grid search configuration. Implements [`Trainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSearch {
    pub costs: Vec<f64>,
    pub gammas: Vec<f64>,
    #[serde(skip, default = "default_kernels")]
    pub kernels: Vec<KernelKind>,
    /// Requested fold count; reduced to the smallest class size, never below 2.
    pub folds: usize,
    pub tolerance: f64,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            costs: DEFAULT_COSTS.to_vec(),
            gammas: DEFAULT_GAMMAS.to_vec(),
            kernels: default_kernels(),
            folds: DEFAULT_FOLDS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

fn default_kernels() -> Vec<KernelKind> {
    vec![KernelKind::Rbf]
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct GridResult {
    pub best: SvmParams,
    pub best_score: f64,
    /// Mean CV accuracy of every candidate, in enumeration order.
    pub scores: Vec<(SvmParams, f64)>,
}

impl GridSearch {
    /// All candidates in enumeration order.
    pub fn candidates(&self) -> Vec<SvmParams> {
        let mut out = Vec::with_capacity(self.costs.len() * self.kernels.len() * self.gammas.len());
        for &c in &self.costs {
            for &gamma in &self.gammas {
                for &kind in &self.kernels {
                    out.push(SvmParams { c, kernel: kind.with_gamma(gamma) });
                }
            }
        }
        out
    }

    /// Score every candidate and pick the best.
    pub fn search(&self, x: &DMatrix<f64>, labels: &[u8]) -> Result<GridResult> {
        validate(x, labels)?;
        let candidates = self.candidates();
        if candidates.is_empty() {
            return Err(SvmError::EmptyGrid);
        }
        let (fold_of, k) = stratified_folds(labels, self.folds)?;
        let rows = matrix_rows(x);

        #[cfg(feature = "parallel")]
        let scores: Vec<f64> = candidates
            .par_iter()
            .map(|&p| cv_accuracy(&rows, labels, &fold_of, k, p, self.tolerance))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let scores: Vec<f64> = candidates
            .iter()
            .map(|&p| cv_accuracy(&rows, labels, &fold_of, k, p, self.tolerance))
            .collect();

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, &s) in scores.iter().enumerate() {
            if s > best_score {
                best_score = s;
                best = i;
            }
        }
        log::debug!(
            "grid search over {} candidates, {k} folds: best C={} {} score={best_score:.4}",
            candidates.len(),
            candidates[best].c,
            candidates[best].kernel
        );
        Ok(GridResult {
            best: candidates[best],
            best_score,
            scores: candidates.into_iter().zip(scores).collect(),
        })
    }
}

impl Trainer for GridSearch {
    type Model = SvmModel;

    fn fit(&self, x: &DMatrix<f64>, labels: &[u8]) -> Result<SvmModel> {
        let result = self.search(x, labels)?;
        Ok(SvmModel::train_rows(&matrix_rows(x), labels, result.best, self.tolerance))
    }
}

/// Assign every sample a fold in `0..k`.
///
/// Returns the fold index per sample and the effective fold count
/// `k = max(2, min(requested, smallest class size))`.
pub fn stratified_folds(labels: &[u8], requested: usize) -> Result<(Vec<usize>, usize)> {
    let mut smallest = usize::MAX;
    for class in [COVER, STEGO] {
        let count = labels.iter().filter(|&&l| l == class).count();
        if count < 2 {
            return Err(SvmError::TooFewSamples { class, count });
        }
        smallest = smallest.min(count);
    }
    let k = requested.min(smallest).max(2);

    let mut fold_of = vec![0usize; labels.len()];
    for class in [COVER, STEGO] {
        let members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == class).collect();
        let base = members.len() / k;
        let extra = members.len() % k;
        let mut pos = 0;
        for fold in 0..k {
            let size = base + usize::from(fold < extra);
            for &i in &members[pos..pos + size] {
                fold_of[i] = fold;
            }
            pos += size;
        }
    }
    Ok((fold_of, k))
}

fn cv_accuracy(
    rows: &[Vec<f64>],
    labels: &[u8],
    fold_of: &[usize],
    k: usize,
    params: SvmParams,
    tol: f64,
) -> f64 {
    let mut total = 0.0;
    for fold in 0..k {
        let mut train_rows = Vec::new();
        let mut train_labels = Vec::new();
        let mut test = Vec::new();
        for (i, &f) in fold_of.iter().enumerate() {
            if f == fold {
                test.push(i);
            } else {
                train_rows.push(rows[i].clone());
                train_labels.push(labels[i]);
            }
        }
        let model = SvmModel::train_rows(&train_rows, &train_labels, params, tol);
        let correct = test
            .iter()
            .filter(|&&i| {
                let predicted = if model.decision(&rows[i]) > 0.0 { STEGO } else { COVER };
                predicted == labels[i]
            })
            .count();
        total += correct as f64 / test.len() as f64;
    }
    total / k as f64
}
