// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Labelled testing sets with a chosen share of stego images.
//!
//! ```text
//! <out>/<ALGO>_<rate>_<coverdir>_<perc>/
//!     cover/      untouched images
//!     stego/      images with an embedded payload
//!     labels.txt  name:0 / name:1, in image order
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::config::AtsConfig;
use super::error::{AtsError, Result};
use super::pool::{BatchReport, WorkerPool};
use super::tools::{
    bitrate_label, hide_message, image_stem, pgm_files, remove_quietly, EmbeddingAlgorithm,
    SeedSource,
};
use crate::features::labels::append_label;
use crate::features::{COVER, STEGO};

/// What [`gen_testing_set`] produced.
#[derive(Debug)]
pub struct TestingSet {
    pub dir: PathBuf,
    pub covers: usize,
    /// One outcome per image selected for embedding.
    pub embedding: BatchReport<PathBuf>,
}

struct EmbedTask {
    tmp: PathBuf,
    dst: PathBuf,
    seed: i32,
    scratch: PathBuf,
}

/// Build a testing set from the `*.pgm` images of `cover_dir`.
///
/// Images are visited in sorted order; image `n` (1-based) is embedded when
/// `n <= count * perc / 100`. Embedding runs on the worker pool; an image
/// whose embedding fails is reported, left out of `stego/` and its scratch
/// copy removed.
pub fn gen_testing_set(
    config: &AtsConfig,
    cover_dir: &Path,
    perc: f64,
    output_dir: &Path,
    algorithm: EmbeddingAlgorithm,
    bitrate: f64,
) -> Result<TestingSet> {
    if !cover_dir.is_dir() {
        return Err(AtsError::MissingDirectory { path: cover_dir.to_path_buf() });
    }
    let tmp_dir = output_dir.join("tmp");
    fs::create_dir_all(&tmp_dir).map_err(|e| AtsError::io(&tmp_dir, e))?;

    let cover_name = cover_dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let image_dir =
        output_dir.join(format!("{algorithm}_{}_{cover_name}_{perc}", bitrate_label(bitrate)));
    if image_dir.exists() {
        return Err(AtsError::AlreadyExists { path: image_dir });
    }
    let out_cover = image_dir.join("cover");
    let out_stego = image_dir.join("stego");
    for dir in [&image_dir, &out_cover, &out_stego] {
        fs::create_dir(dir).map_err(|e| AtsError::io(dir, e))?;
    }
    let labels = image_dir.join("labels.txt");

    let files = pgm_files(cover_dir)?;
    let threshold = files.len() as f64 * perc / 100.0;
    let mut seeds = SeedSource::new(config.seed);
    let mut tasks = Vec::new();
    let mut covers = 0;

    for (i, file) in files.iter().enumerate() {
        let name = image_stem(file);
        let tmp = tmp_dir.join(format!("{name}_{}.pgm", seeds.tag()));
        fs::copy(file, &tmp).map_err(|e| AtsError::io(file, e))?;

        if (i + 1) as f64 <= threshold {
            append_label(&labels, &name, STEGO)?;
            let task = EmbedTask {
                tmp,
                dst: out_stego.join(format!("{name}.pgm")),
                seed: seeds.embed_seed(),
                scratch: tmp_dir.join(format!("out_{}", seeds.tag())),
            };
            tasks.push((name, task));
        } else {
            append_label(&labels, &name, COVER)?;
            let dst = out_cover.join(format!("{name}.pgm"));
            fs::rename(&tmp, &dst).map_err(|e| AtsError::io(&tmp, e))?;
            covers += 1;
        }
    }

    let pool = WorkerPool::new(config.workers)?;
    let embedding = pool.run("embedding", tasks, |task: EmbedTask| {
        let result = hide_message(config, algorithm, &task.tmp, bitrate, task.seed, &task.scratch)
            .and_then(|()| fs::rename(&task.tmp, &task.dst).map_err(|e| AtsError::io(&task.tmp, e)));
        match result {
            Ok(()) => Ok(task.dst),
            Err(e) => {
                remove_quietly(&task.tmp);
                Err(e)
            }
        }
    });
    log::info!(
        "testing set {}: {covers} cover, {} stego, {} failed",
        image_dir.display(),
        embedding.succeeded(),
        embedding.failed()
    );
    Ok(TestingSet { dir: image_dir, covers, embedding })
}
