// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Integration tests for MA_PPD domain adaptation.
//!
//! The two-domain fixture is a pair of 2-D Gaussian clusters (cover around
//! the origin, stego around (4.5, 0)); the target domain is the same layout
//! shifted by (4, 0). A classifier trained on the source calls every target
//! point stego, while the aligned embedding separates them.

use approx::assert_abs_diff_eq;
use nalgebra::DMatrix;

use stegalign_core::align::AlignError;
use stegalign_core::graph::laplacian::row_sums;
use stegalign_core::{
    accuracy, build_adjacency, evaluate_adaptation, laplacian, AlignConfig, GridSearch,
    LabelAffinity, ManifoldAligner,
};

const SOURCE: [[f64; 2]; 20] = [
    [0.50, -1.79], [-0.78, 0.07], [1.47, 0.00], [-1.66, 0.31], [-1.20, 1.23],
    [-0.26, 1.78], [-0.13, -1.03], [-1.47, -0.36], [0.45, 1.19], [0.27, -0.74],
    [4.50, -1.44], [4.50, -0.75], [5.50, 0.99], [4.37, -1.02], [4.55, 0.37],
    [3.45, -0.62], [5.27, -0.40], [4.44, 1.39], [2.51, 1.79], [5.01, -0.65],
];

const TARGET: [[f64; 2]; 20] = [
    [3.05, -1.22], [4.94, -2.57], [4.93, 0.17], [3.32, -0.51], [3.63, -0.23],
    [4.89, -0.84], [5.09, 0.99], [3.75, 0.61], [3.46, 0.06], [4.50, 1.94],
    [7.95, -0.15], [8.03, -0.18], [6.92, 1.88], [7.38, -0.59], [7.29, 0.69],
    [10.97, 3.04], [8.99, 0.35], [7.98, -1.01], [8.74, -0.09], [10.09, -0.27],
];

fn matrix(points: &[[f64; 2]]) -> DMatrix<f64> {
    DMatrix::from_fn(points.len(), 2, |i, j| points[i][j])
}

fn labels() -> Vec<u8> {
    let mut l = vec![0u8; 10];
    l.extend([1u8; 10]);
    l
}

fn config() -> AlignConfig {
    AlignConfig { dimensions: 2, neighbors: 5, ..AlignConfig::default() }
}

#[test]
fn alignment_beats_raw_features_on_shifted_domain() {
    let x = matrix(&SOURCE);
    let y = matrix(&TARGET);
    let l = labels();

    let aligner = ManifoldAligner::new(config());
    let report = evaluate_adaptation(&aligner, &x, &l, &y, &l).unwrap();

    assert_eq!(report.baseline, 50.0, "shift should fool the raw classifier");
    assert!(
        report.adapted > report.baseline,
        "adapted {} <= baseline {}",
        report.adapted,
        report.baseline
    );
    assert!(report.improvement() > 0.0);
}

#[test]
fn embedding_shape_and_unit_columns() {
    let x = matrix(&SOURCE);
    let y = matrix(&TARGET);
    let alignment = ManifoldAligner::new(config()).align(&x, &labels(), &y).unwrap();

    assert_eq!(alignment.source.shape(), (20, 2));
    assert_eq!(alignment.target.shape(), (20, 2));
    assert_eq!(alignment.eigenvalues.len(), 2);
    assert!(alignment.eigenvalues[0] >= 1e-8);
    assert!(alignment.eigenvalues[0] <= alignment.eigenvalues[1]);

    for c in 0..2 {
        let sq: f64 = alignment.source.column(c).norm_squared()
            + alignment.target.column(c).norm_squared();
        assert_abs_diff_eq!(sq.sqrt(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn embedding_rows_follow_input_rows() {
    let x = matrix(&SOURCE);
    let y = matrix(&TARGET);
    // perm[i] is the original target row placed at position i
    let perm: Vec<usize> = (0..20).map(|i| (19 - i + 7) % 20).collect();
    let py = DMatrix::from_fn(20, 2, |i, j| y[(perm[i], j)]);

    let aligner = ManifoldAligner::new(config());
    let plain = aligner.align(&x, &labels(), &y).unwrap();
    let shuffled = aligner.align(&x, &labels(), &py).unwrap();

    for (a, b) in plain.eigenvalues.iter().zip(&shuffled.eigenvalues) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
    }
    for c in 0..2 {
        // eigenvector sign is arbitrary; fix it on the unchanged source block
        let dot = plain.source.column(c).dot(&shuffled.source.column(c));
        let sign = if dot < 0.0 { -1.0 } else { 1.0 };
        for i in 0..20 {
            assert_abs_diff_eq!(shuffled.source[(i, c)], sign * plain.source[(i, c)], epsilon = 1e-6);
            assert_abs_diff_eq!(
                shuffled.target[(i, c)],
                sign * plain.target[(perm[i], c)],
                epsilon = 1e-6
            );
        }
    }
}

#[test]
fn too_many_dimensions_is_an_error() {
    // 40 graph nodes and at least one zero eigenvalue: 40 components cannot survive
    let cfg = AlignConfig { dimensions: 40, ..config() };
    let err = ManifoldAligner::new(cfg)
        .align(&matrix(&SOURCE), &labels(), &matrix(&TARGET))
        .unwrap_err();
    match err {
        AlignError::InsufficientComponents { requested, available } => {
            assert_eq!(requested, 40);
            assert!(available < 40);
        }
        other => panic!("expected InsufficientComponents, got {other:?}"),
    }
}

#[test]
fn unequal_domain_sizes_rejected() {
    let y = matrix(&TARGET[..19]);
    let err = ManifoldAligner::new(config()).align(&matrix(&SOURCE), &labels(), &y).unwrap_err();
    assert!(matches!(err, AlignError::ShapeMismatch { expected: 20, found: 19, .. }));
}

#[test]
fn feature_dimension_mismatch_rejected() {
    let y = DMatrix::zeros(20, 3);
    let err = ManifoldAligner::new(config()).align(&matrix(&SOURCE), &labels(), &y).unwrap_err();
    assert!(matches!(err, AlignError::ShapeMismatch { expected: 2, found: 3, .. }));
}

#[test]
fn baseline_accuracy_uses_target_count() {
    let x = matrix(&SOURCE);
    let acc = accuracy(&GridSearch::default(), &x, &labels(), &x, &labels()).unwrap();
    assert_eq!(acc, 100.0);
}

#[test]
fn knn_graph_is_symmetric_and_laplacian_rows_vanish() {
    let x = matrix(&SOURCE);
    let l = labels();
    let aff = LabelAffinity { labels: &l, bonus: 1000.0, penalty: 0.001 };
    for w in [build_adjacency(&x, 5, None), build_adjacency(&x, 5, Some(&aff))] {
        assert_eq!(w, w.transpose());
        for i in 0..20 {
            assert_eq!(w[(i, i)], 0.0);
        }
        for s in row_sums(&laplacian(&w)) {
            assert_abs_diff_eq!(s, 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn knn_graph_commutes_with_permutation() {
    let x = matrix(&SOURCE);
    // reverse-and-rotate permutation: perm[i] is the original row at position i
    let perm: Vec<usize> = (0..20).map(|i| (19 - i + 7) % 20).collect();
    let px = DMatrix::from_fn(20, 2, |i, j| x[(perm[i], j)]);

    let w = build_adjacency(&x, 4, None);
    let pw = build_adjacency(&px, 4, None);
    for i in 0..20 {
        for j in 0..20 {
            assert_abs_diff_eq!(pw[(i, j)], w[(perm[i], perm[j])], epsilon = 1e-12);
        }
    }
}
