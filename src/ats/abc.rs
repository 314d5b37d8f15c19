// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! A/B/C feature sets for artificial-training-set classification.
//!
//! - A: features of the images as given.
//! - B: features after embedding once more into each image.
//! - C: features after embedding a second time into the B image.
//!
//! A classifier trained on A (cover) against C (stego) then labels B: an
//! image whose B features look like C already carried a payload.
//!
//! ```text
//! <out>/ATS_<EXT>_<inputdir>/
//!     A_COMMON/            shared by every algorithm and rate
//!     B_<ALGO>_<rate3>/
//!     C_<ALGO>_<rate3>/
//! ```
//!
//! Existing A, and existing B together with C, are reused as a cache.

use std::fs;
use std::path::{Path, PathBuf};

use super::config::AtsConfig;
use super::error::{AtsError, Result};
use super::pool::{BatchReport, WorkerPool};
use super::tools::{
    bitrate_code, extract_features, hide_message, image_stem, pgm_files, remove_quietly,
    EmbeddingAlgorithm, FeatureExtractor, SeedSource,
};

/// Directories produced by [`prepare_abc_sets`] and the batches that ran.
#[derive(Debug)]
pub struct AbcSets {
    pub a: PathBuf,
    pub b: PathBuf,
    pub c: PathBuf,
    /// `None` when A came from the cache.
    pub a_batch: Option<BatchReport<()>>,
    /// `None` when B and C came from the cache.
    pub bc_batch: Option<BatchReport<()>>,
}

struct Scratch {
    name: String,
    image: PathBuf,
    seeds: [i32; 2],
    dirs: [PathBuf; 2],
}

/// Images of a testing set: `*.pgm` directly in `dir` and one level below
/// (so both `cover/` and `stego/` of a generated set are picked up).
fn input_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = pgm_files(dir)?;
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AtsError::io(dir, e))? {
        let path = entry.map_err(|e| AtsError::io(dir, e))?.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();
    for sub in subdirs {
        files.extend(pgm_files(&sub)?);
    }
    Ok(files)
}

/// Extract A, B and C features for the images of `input_dir`.
pub fn prepare_abc_sets(
    config: &AtsConfig,
    input_dir: &Path,
    output_dir: &Path,
    algorithm: EmbeddingAlgorithm,
    bitrate: f64,
    extractor: FeatureExtractor,
) -> Result<AbcSets> {
    if !input_dir.is_dir() {
        return Err(AtsError::MissingDirectory { path: input_dir.to_path_buf() });
    }
    let input_name = input_dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let root = output_dir.join(format!("ATS_{extractor}_{input_name}"));
    let tmp_dir = output_dir.join("tmp");
    for dir in [&root, &tmp_dir] {
        fs::create_dir_all(dir).map_err(|e| AtsError::io(dir, e))?;
    }

    let pool = WorkerPool::new(config.workers)?;
    let mut seeds = SeedSource::new(config.seed);
    let images = input_images(input_dir)?;

    let dir_a = root.join("A_COMMON");
    let a_batch = if dir_a.is_dir() {
        log::info!("using cached features: {}", dir_a.display());
        None
    } else {
        fs::create_dir(&dir_a).map_err(|e| AtsError::io(&dir_a, e))?;
        let mut tasks = Vec::with_capacity(images.len());
        for file in &images {
            let name = image_stem(file);
            let tmp = tmp_dir.join(format!("{name}_{}.pgm", seeds.tag()));
            fs::copy(file, &tmp).map_err(|e| AtsError::io(file, e))?;
            tasks.push((name.clone(), (name, tmp)));
        }
        Some(pool.run("A features", tasks, |(name, tmp): (String, PathBuf)| {
            let result = extract_features(config, extractor, &tmp, &dir_a.join(name));
            remove_quietly(&tmp);
            result
        }))
    };

    let rate = bitrate_code(bitrate);
    let dir_b = root.join(format!("B_{algorithm}_{rate}"));
    let dir_c = root.join(format!("C_{algorithm}_{rate}"));
    let bc_batch = if dir_b.is_dir() && dir_c.is_dir() {
        log::info!("using cached features: {}", dir_b.display());
        log::info!("using cached features: {}", dir_c.display());
        None
    } else {
        for dir in [&dir_b, &dir_c] {
            if dir.is_dir() {
                fs::remove_dir_all(dir).map_err(|e| AtsError::io(dir, e))?;
            }
            fs::create_dir(dir).map_err(|e| AtsError::io(dir, e))?;
        }
        let mut tasks = Vec::with_capacity(images.len());
        for file in &images {
            let name = image_stem(file);
            let image = tmp_dir.join(format!("{name}_{}.pgm", seeds.tag()));
            fs::copy(file, &image).map_err(|e| AtsError::io(file, e))?;
            let scratch = Scratch {
                name: name.clone(),
                image,
                seeds: [seeds.embed_seed(), seeds.embed_seed()],
                dirs: [
                    tmp_dir.join(format!("out_{}", seeds.tag())),
                    tmp_dir.join(format!("out_{}", seeds.tag())),
                ],
            };
            tasks.push((name, scratch));
        }
        Some(pool.run("B/C features", tasks, |s: Scratch| {
            let dirs = [dir_b.as_path(), dir_c.as_path()];
            let result = embed_twice(config, algorithm, bitrate, extractor, &s, dirs);
            remove_quietly(&s.image);
            result
        }))
    };

    Ok(AbcSets { a: dir_a, b: dir_b, c: dir_c, a_batch, bc_batch })
}

/// Embed, extract into B, embed again, extract into C.
fn embed_twice(
    config: &AtsConfig,
    algorithm: EmbeddingAlgorithm,
    bitrate: f64,
    extractor: FeatureExtractor,
    s: &Scratch,
    [dir_b, dir_c]: [&Path; 2],
) -> Result<()> {
    hide_message(config, algorithm, &s.image, bitrate, s.seeds[0], &s.dirs[0])?;
    extract_features(config, extractor, &s.image, &dir_b.join(&s.name))?;
    hide_message(config, algorithm, &s.image, bitrate, s.seeds[1], &s.dirs[1])?;
    extract_features(config, extractor, &s.image, &dir_c.join(&s.name))
}
