// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Feature files on disk: CSV tables for MA_PPD and SRM directories for the
//! A/B/C classifier.

use std::fs;
use std::path::Path;

use stegalign_core::ats::{classify_abc, AbcVerdict};
use stegalign_core::{FeatureError, FeatureTable, GridSearch, COVER, STEGO};

fn write_fea(root: &Path, image: &str, submodel: &str, values: &[f64]) {
    let dir = root.join(image);
    fs::create_dir_all(&dir).unwrap();
    let mut line: String = values.iter().map(|v| format!("{v} ")).collect();
    line.push_str("end\n");
    fs::write(dir.join(format!("{submodel}.fea")), line).unwrap();
}

/// One image with a discriminative two-value sub-model and a noise sub-model.
fn write_image(root: &Path, image: &str, signal: [f64; 2], noise: f64) {
    write_fea(root, image, "s1", &signal);
    write_fea(root, image, "s2", &[noise]);
}

#[test]
fn table_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("source.csv");
    fs::write(&path, "0.5,1.5,cover\n2.0,-1.0,stego\n\n0.25,0.75,,cover\n").unwrap();

    let table = FeatureTable::load(&path).unwrap();
    assert_eq!(table.n_samples(), 3);
    assert_eq!(table.dimension(), 2);
    assert_eq!(table.labels(), &[COVER, STEGO, COVER]);
    assert_eq!(table.features()[(1, 0)], 2.0);
    assert_eq!(table.features()[(2, 1)], 0.75);
}

#[test]
fn ragged_table_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "1,2,3,cover\n4,5,stego\n").unwrap();

    match FeatureTable::load(&path).unwrap_err() {
        FeatureError::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn missing_table_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FeatureTable::load(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, FeatureError::Io { .. }));
}

fn abc_fixture(root: &Path) {
    let (a, b, c) = (root.join("A"), root.join("B"), root.join("C"));
    for i in 0..6 {
        let noise = 5.0 + 0.1 * i as f64;
        let step = i as f64;
        write_image(&a, &format!("a{i}"), [0.10 + 0.02 * step, 0.20 + 0.01 * step], noise);
        write_image(&c, &format!("c{i}"), [0.80 + 0.02 * step, 0.90 - 0.01 * step], noise);
    }
    write_image(&b, "img1", [0.13, 0.22], 9.0);
    write_image(&b, "img2", [0.83, 0.88], 1.0);
    write_image(&b, "img3", [0.17, 0.24], 1.0);
    write_image(&b, "img4", [0.86, 0.87], 9.0);
}

#[test]
fn abc_classification_scores_against_labels() {
    let root = tempfile::tempdir().unwrap();
    abc_fixture(root.path());
    let labels = root.path().join("labels.txt");
    fs::write(&labels, "img1:0\nimg2:1\nimg3:0\nimg4:1\n").unwrap();

    let verdict = classify_abc(
        &GridSearch::default(),
        &root.path().join("A"),
        &root.path().join("B"),
        &root.path().join("C"),
        Some(&labels),
        2,
    )
    .unwrap();
    assert_eq!(verdict, AbcVerdict::Accuracy(1.0));
}

#[test]
fn abc_without_labels_lists_predictions() {
    let root = tempfile::tempdir().unwrap();
    abc_fixture(root.path());

    let verdict = classify_abc(
        &GridSearch::default(),
        &root.path().join("A"),
        &root.path().join("B"),
        &root.path().join("C"),
        Some(&root.path().join("missing.txt")),
        2,
    )
    .unwrap();
    let expected = vec![
        ("img1".to_string(), COVER),
        ("img2".to_string(), STEGO),
        ("img3".to_string(), COVER),
        ("img4".to_string(), STEGO),
    ];
    assert_eq!(verdict, AbcVerdict::Predictions(expected));
}
