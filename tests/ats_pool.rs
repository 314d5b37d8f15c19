// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Testing-set generation against a stand-in embedding tool.
//!
//! The fake embedder is a shell script that copies its input into the
//! output directory and refuses one image, so a batch with a failing task
//! can be checked end to end.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use stegalign_core::ats::{gen_testing_set, AtsConfig, AtsError, EmbeddingAlgorithm};

const FAKE_EMBEDDER: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
    case "$1" in
        -i) img="$2"; shift 2 ;;
        -O) out="$2"; shift 2 ;;
        *) shift ;;
    esac
done
case "$(basename "$img")" in
    img2_*) echo "payload does not fit" >&2; exit 3 ;;
esac
cp "$img" "$out/"
"#;

fn fake_tool(dir: &Path) -> PathBuf {
    let path = dir.join("fake_embedder.sh");
    fs::write(&path, FAKE_EMBEDDER).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn covers(dir: &Path, count: usize) -> PathBuf {
    let covers = dir.join("covers");
    fs::create_dir(&covers).unwrap();
    for i in 1..=count {
        fs::write(covers.join(format!("img{i}.pgm")), format!("P5 2 2 255 {i}")).unwrap();
    }
    // not an image, must be ignored
    fs::write(covers.join("notes.txt"), "x").unwrap();
    covers
}

#[test]
fn failed_embedding_does_not_stop_the_batch() {
    let work = tempfile::tempdir().unwrap();
    let config = AtsConfig {
        hugo_bin: fake_tool(work.path()),
        workers: 2,
        seed: Some(7),
        ..AtsConfig::default()
    };
    let cover_dir = covers(work.path(), 4);
    let out = work.path().join("out");

    let set = gen_testing_set(&config, &cover_dir, 75.0, &out, EmbeddingAlgorithm::Hugo, 0.4)
        .unwrap();

    assert_eq!(set.dir, out.join("HUGO_0.4_covers_75"));
    assert_eq!(set.covers, 1);
    assert_eq!(set.embedding.outcomes.len(), 3);
    assert_eq!(set.embedding.succeeded(), 2);
    assert_eq!(set.embedding.failures().collect::<Vec<_>>(), vec!["img2"]);

    assert!(set.dir.join("stego/img1.pgm").is_file());
    assert!(set.dir.join("stego/img3.pgm").is_file());
    assert!(!set.dir.join("stego/img2.pgm").exists());
    assert!(set.dir.join("cover/img4.pgm").is_file());
    assert_eq!(fs::read_to_string(set.dir.join("stego/img3.pgm")).unwrap(), "P5 2 2 255 3");

    let labels = fs::read_to_string(set.dir.join("labels.txt")).unwrap();
    assert_eq!(labels, "img1:1\nimg2:1\nimg3:1\nimg4:0\n");

    // the rejected image's scratch copy is cleaned up too
    let leftovers: Vec<_> = fs::read_dir(out.join("tmp"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "pgm"))
        .collect();
    assert!(leftovers.is_empty(), "scratch images left behind: {leftovers:?}");

    // a second run must not overwrite the set
    let again = gen_testing_set(&config, &cover_dir, 75.0, &out, EmbeddingAlgorithm::Hugo, 0.4);
    assert!(matches!(again, Err(AtsError::AlreadyExists { .. })));
}

#[test]
fn missing_tool_fails_every_task() {
    let work = tempfile::tempdir().unwrap();
    let config = AtsConfig {
        hugo_bin: work.path().join("no-such-tool"),
        workers: 1,
        seed: Some(1),
        ..AtsConfig::default()
    };
    let cover_dir = covers(work.path(), 2);
    let set = gen_testing_set(
        &config,
        &cover_dir,
        100.0,
        &work.path().join("out"),
        EmbeddingAlgorithm::Hugo,
        1.0,
    )
    .unwrap();

    assert_eq!(set.covers, 0);
    assert_eq!(set.embedding.failed(), 2);
    for outcome in &set.embedding.outcomes {
        assert!(matches!(outcome.result, Err(AtsError::ToolNotFound { .. })));
    }
}

#[test]
fn missing_cover_directory_rejected() {
    let work = tempfile::tempdir().unwrap();
    let err = gen_testing_set(
        &AtsConfig::default(),
        &work.path().join("absent"),
        50.0,
        work.path(),
        EmbeddingAlgorithm::Wow,
        0.4,
    )
    .unwrap_err();
    assert!(matches!(err, AtsError::MissingDirectory { .. }));
}
