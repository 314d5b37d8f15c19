// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Unnormalized graph Laplacian `L = D - W`.

use nalgebra::DMatrix;

/// Laplacian of a square adjacency matrix.
///
/// Self-loops in `w` are ignored: the diagonal is treated as zero before the
/// degrees (row sums) are taken. For symmetric non-negative `w` the result is
/// symmetric positive-semidefinite with zero row sums.
pub fn laplacian(w: &DMatrix<f64>) -> DMatrix<f64> {
    let n = w.nrows();
    debug_assert_eq!(n, w.ncols(), "adjacency must be square");

    let mut lap = -w.clone();
    lap.fill_diagonal(0.0);
    for i in 0..n {
        let degree: f64 = -(0..n).map(|j| lap[(i, j)]).sum::<f64>();
        lap[(i, i)] = degree;
    }
    lap
}

/// Row sums of a matrix (the degree vector of an adjacency matrix).
pub fn row_sums(m: &DMatrix<f64>) -> Vec<f64> {
    (0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m[(i, j)]).sum())
        .collect()
}
