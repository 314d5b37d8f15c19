// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Manifold alignment of a labelled source domain and an unlabelled target
//! domain into a shared low-dimensional space.
//!
//! ```text
//! fit classifier on source ──► rank source & target by P(stego)
//!                                         │
//!   Wx (k-NN, label bonus/penalty)        ▼
//!   Wy (k-NN)                     Wxy (rank-matched bridges)
//!            └──────────► W = [[Wx, Wxy], [Wxyᵀ, Wy]] ──► L = D - W
//!                                                          │
//!        smallest eigenvalues >= eps, first d, unit norm ◄─┘
//!                          │
//!        rows 0..n ─► source embedding, rows n..2n ─► target embedding
//! ```
//!
//! Graph nodes stay in original sample order throughout, so embedding row
//! `i` always belongs to input row `i`.

use nalgebra::{DMatrix, SymmetricEigen};

use super::correspondence::{Correspondence, Ranking};
use super::error::{AlignError, Result};
use crate::graph::{build_adjacency, laplacian, LabelAffinity};
use crate::svm::{Classifier, GridSearch, Trainer};

/// Parameters of an alignment run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    /// Embedding dimensionality `d`.
    pub dimensions: usize,
    /// Neighbour count `k` of both within-domain graphs.
    pub neighbors: usize,
    /// Eigenvalues below this are treated as zero and discarded.
    pub eps: f64,
    /// Source edge multiplier for equal labels.
    pub label_bonus: f64,
    /// Source edge multiplier for differing labels.
    pub label_penalty: f64,
    /// Iteration bound of the eigensolver; 0 means unbounded.
    pub max_eigen_iterations: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            dimensions: 2,
            neighbors: 5,
            eps: 1e-8,
            label_bonus: 1000.0,
            label_penalty: 0.001,
            max_eigen_iterations: 100_000,
        }
    }
}

/// Neighbour count used for `n` source samples when none is given:
/// `round(sqrt(n))`, at least 1.
pub fn neighbors_for(n: usize) -> usize {
    ((n as f64).sqrt().round() as usize).max(1)
}

/// Result of an alignment run.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// `n x d` source coordinates, row order of the source input.
    pub source: DMatrix<f64>,
    /// `n x d` target coordinates, row order of the target input.
    pub target: DMatrix<f64>,
    /// Eigenvalues of the retained components, ascending.
    pub eigenvalues: Vec<f64>,
}

/// Aligns two feature domains; generic over the classifier used to build
/// the cross-domain correspondence.
#[derive(Debug, Clone)]
pub struct ManifoldAligner<T = GridSearch> {
    config: AlignConfig,
    trainer: T,
}

impl ManifoldAligner<GridSearch> {
    /// Aligner with the default grid-searched SVM.
    pub fn new(config: AlignConfig) -> Self {
        Self { config, trainer: GridSearch::default() }
    }
}

impl<T: Trainer> ManifoldAligner<T> {
    pub fn with_trainer(config: AlignConfig, trainer: T) -> Self {
        Self { config, trainer }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    /// Align source `x` (labelled by `labels`) with target `y`.
    pub fn align(&self, x: &DMatrix<f64>, labels: &[u8], y: &DMatrix<f64>) -> Result<Alignment> {
        self.check_inputs(x, labels, y)?;
        let cfg = &self.config;
        let n = x.nrows();

        let model = self.trainer.fit(x, labels)?;
        let source_rank = Ranking::new(&model.stego_probability(x)?, &model.predict(x)?)?;
        let target_rank = Ranking::new(&model.stego_probability(y)?, &model.predict(y)?)?;
        let correspondence = Correspondence::new(&source_rank, &target_rank);

        let affinity = LabelAffinity { labels, bonus: cfg.label_bonus, penalty: cfg.label_penalty };
        let wx = build_adjacency(x, cfg.neighbors, Some(&affinity));
        let wy = build_adjacency(y, cfg.neighbors, None);
        let wxy = correspondence.bridge_matrix(n, n);

        let mut w = DMatrix::zeros(2 * n, 2 * n);
        w.view_mut((0, 0), (n, n)).copy_from(&wx);
        w.view_mut((0, n), (n, n)).copy_from(&wxy);
        w.view_mut((n, 0), (n, n)).copy_from(&wxy.transpose());
        w.view_mut((n, n), (n, n)).copy_from(&wy);

        let lap = laplacian(&w);
        let (embedding, eigenvalues) =
            spectral_embedding(&lap, cfg.dimensions, cfg.eps, cfg.max_eigen_iterations)?;
        log::debug!("retained eigenvalues: {eigenvalues:?}");

        Ok(Alignment {
            source: embedding.rows(0, n).into_owned(),
            target: embedding.rows(n, n).into_owned(),
            eigenvalues,
        })
    }

    fn check_inputs(&self, x: &DMatrix<f64>, labels: &[u8], y: &DMatrix<f64>) -> Result<()> {
        let cfg = &self.config;
        if cfg.dimensions == 0 {
            return Err(AlignError::InvalidParameter("dimensions must be at least 1".into()));
        }
        if cfg.neighbors == 0 {
            return Err(AlignError::InvalidParameter("neighbors must be at least 1".into()));
        }
        if !cfg.eps.is_finite() || cfg.eps < 0.0 {
            return Err(AlignError::InvalidParameter(format!("eps must be finite and >= 0, got {}", cfg.eps)));
        }
        if labels.len() != x.nrows() {
            return Err(AlignError::ShapeMismatch {
                what: "source labels",
                expected: x.nrows(),
                found: labels.len(),
            });
        }
        if y.nrows() != x.nrows() {
            return Err(AlignError::ShapeMismatch {
                what: "target sample count",
                expected: x.nrows(),
                found: y.nrows(),
            });
        }
        if y.ncols() != x.ncols() {
            return Err(AlignError::ShapeMismatch {
                what: "target feature dimension",
                expected: x.ncols(),
                found: y.ncols(),
            });
        }
        Ok(())
    }
}

/// Embed the nodes of a graph with Laplacian `lap` into `d` dimensions.
///
/// Takes the eigenvectors of the `d` smallest eigenvalues that are not below
/// `eps`, scaled to unit length, as columns. Returns the embedding together
/// with the eigenvalues of the chosen columns.
pub fn spectral_embedding(
    lap: &DMatrix<f64>,
    d: usize,
    eps: f64,
    max_iterations: usize,
) -> Result<(DMatrix<f64>, Vec<f64>)> {
    if lap.iter().any(|v| !v.is_finite()) {
        return Err(AlignError::Eigendecomposition("Laplacian has non-finite entries".into()));
    }
    let n = lap.nrows();
    let eig = SymmetricEigen::try_new(lap.clone(), f64::EPSILON, max_iterations).ok_or_else(|| {
        AlignError::Eigendecomposition(format!("no convergence within {max_iterations} iterations"))
    })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]).then(a.cmp(&b)));
    let usable: Vec<usize> = order.into_iter().filter(|&i| eig.eigenvalues[i] >= eps).collect();
    if usable.len() < d {
        return Err(AlignError::InsufficientComponents { requested: d, available: usable.len() });
    }

    let mut embedding = DMatrix::zeros(n, d);
    let mut values = Vec::with_capacity(d);
    for (c, &i) in usable.iter().take(d).enumerate() {
        let column = eig.eigenvectors.column(i);
        let norm = column.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(AlignError::Eigendecomposition(format!("degenerate eigenvector {i}")));
        }
        embedding.set_column(c, &(column / norm));
        values.push(eig.eigenvalues[i]);
    }
    Ok((embedding, values))
}
