// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Similarity-weighted k-nearest-neighbour graphs.
//!
//! Each sample is linked to its `k` nearest samples under squared Euclidean
//! distance, and the link is made mutual. Every link (i, j) is then weighted
//! by the heat kernel `exp(-||x_i - x_j||^2)` with no bandwidth term. When
//! labels are known, links between samples of the same class are scaled by a
//! bonus and links across classes by a penalty.
//!
//! Neighbour ranking is a stable ascending sort on distance with ties broken
//! by sample index, so the graph is reproducible for tied distances.

use nalgebra::DMatrix;

/// Label-driven edge scaling for graphs over labelled samples.
#[derive(Debug, Clone, Copy)]
pub struct LabelAffinity<'a> {
    /// One label per sample (row) of the feature matrix.
    pub labels: &'a [u8],
    /// Multiplier for edges between samples with equal labels.
    pub bonus: f64,
    /// Multiplier for edges between samples with different labels.
    pub penalty: f64,
}

impl LabelAffinity<'_> {
    fn factor(&self, i: usize, j: usize) -> f64 {
        if self.labels[i] == self.labels[j] {
            self.bonus
        } else {
            self.penalty
        }
    }
}

/// Squared Euclidean distance between row `i` of `a` and row `j` of `b`.
#[inline]
pub fn row_sq_dist(a: &DMatrix<f64>, i: usize, b: &DMatrix<f64>, j: usize) -> f64 {
    (0..a.ncols()).map(|c| (a[(i, c)] - b[(j, c)]).powi(2)).sum()
}

/// All-pairs squared Euclidean distances between the rows of `x`.
pub fn squared_distances(x: &DMatrix<f64>) -> DMatrix<f64> {
    let n = x.nrows();
    let mut dist = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = row_sq_dist(x, i, x, j);
            dist[(i, j)] = d;
            dist[(j, i)] = d;
        }
    }
    dist
}

/// Indices of the `k` nearest rows to row `i`, self excluded.
fn nearest(dist: &DMatrix<f64>, i: usize, k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dist.nrows()).filter(|&j| j != i).collect();
    order.sort_by(|&a, &b| dist[(i, a)].total_cmp(&dist[(i, b)]).then(a.cmp(&b)));
    order.truncate(k);
    order
}

/// Build the weighted k-NN adjacency matrix over the rows of `x`.
///
/// The result is symmetric and non-negative with a zero diagonal. An edge
/// exists when either endpoint ranks the other among its `k` nearest, so a
/// vertex can end up with more than `k` edges. With `k >= n - 1` every pair
/// is linked.
///
/// `affinity.labels` must hold one label per row of `x`.
pub fn build_adjacency(
    x: &DMatrix<f64>,
    k: usize,
    affinity: Option<&LabelAffinity<'_>>,
) -> DMatrix<f64> {
    let n = x.nrows();
    let dist = squared_distances(x);

    let mut linked = vec![false; n * n];
    for i in 0..n {
        for j in nearest(&dist, i, k) {
            linked[i * n + j] = true;
            linked[j * n + i] = true;
        }
    }

    let mut adj = DMatrix::zeros(n, n);
    let mut edges = 0usize;
    for i in 0..n {
        for j in 0..n {
            if !linked[i * n + j] {
                continue;
            }
            let mut w = (-dist[(i, j)]).exp();
            if let Some(aff) = affinity {
                w *= aff.factor(i, j);
            }
            adj[(i, j)] = w;
            edges += 1;
        }
    }
    log::debug!(
        "k-NN graph: n={n}, k={k}, {} undirected edges, labelled={}",
        edges / 2,
        affinity.is_some()
    );
    adj
}
