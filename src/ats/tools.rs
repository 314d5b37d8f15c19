// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Invocation of the external embedding and feature-extraction binaries.
//!
//! Embedders are called as `<bin> -r <seed> -i <image> -O <outdir> -a <rate>`
//! and write the stego image under its original file name into `<outdir>`.
//! The SRM extractor is called as `<bin> -i <image> -O <outdir>` and writes
//! one `.fea` file per sub-model into `<outdir>`.

use core::fmt;
use core::str::FromStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::config::AtsConfig;
use super::error::{AtsError, Result};

/// Content-adaptive embedding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingAlgorithm {
    Hugo,
    Wow,
    SUniward,
}

impl FromStr for EmbeddingAlgorithm {
    type Err = AtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HUGO" => Ok(Self::Hugo),
            "WOW" => Ok(Self::Wow),
            "UNIW" => Ok(Self::SUniward),
            other => Err(AtsError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for EmbeddingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hugo => "HUGO",
            Self::Wow => "WOW",
            Self::SUniward => "UNIW",
        })
    }
}

/// Feature extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureExtractor {
    /// Spatial rich model.
    Rm,
}

impl FromStr for FeatureExtractor {
    type Err = AtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RM" => Ok(Self::Rm),
            other => Err(AtsError::UnknownExtractor(other.to_string())),
        }
    }
}

impl fmt::Display for FeatureExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rm => f.write_str("RM"),
        }
    }
}

/// Per-task randomness: embedding keys and scratch-name tags.
///
/// Draws happen on the submitting thread, before tasks are handed to the
/// pool, so a fixed seed reproduces the same keys for the same image order.
#[derive(Debug, Clone)]
pub struct SeedSource {
    rng: ChaCha20Rng,
}

impl SeedSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_entropy(),
        };
        Self { rng }
    }

    /// Embedding key in `[-(2^31 - 1), 2^31 - 1]`.
    pub fn embed_seed(&mut self) -> i32 {
        self.rng.gen_range(-i32::MAX..=i32::MAX)
    }

    /// Eight-digit tag for scratch file and directory names.
    pub fn tag(&mut self) -> u32 {
        self.rng.gen_range(10_000_000..=99_999_999)
    }
}

/// Bitrate as it appears on tool command lines and in directory names:
/// shortest decimal form, with `.0` kept for whole numbers.
pub fn bitrate_label(bitrate: f64) -> String {
    if bitrate.fract() == 0.0 {
        format!("{bitrate:.1}")
    } else {
        format!("{bitrate}")
    }
}

/// Bitrate in hundredths, truncated and zero-padded to three digits.
pub fn bitrate_code(bitrate: f64) -> String {
    format!("{:03}", (bitrate * 100.0) as i64)
}

/// File name without its extension.
pub fn image_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Embed a payload into `image` in place.
///
/// `scratch` must not exist yet; it receives the tool output and is removed
/// afterwards.
pub fn hide_message(
    config: &AtsConfig,
    algorithm: EmbeddingAlgorithm,
    image: &Path,
    bitrate: f64,
    seed: i32,
    scratch: &Path,
) -> Result<()> {
    let bin = config.embedder(algorithm);
    ensure_tool(bin)?;
    fs::create_dir_all(scratch).map_err(|e| AtsError::io(scratch, e))?;

    let mut cmd = Command::new(bin);
    cmd.arg("-r")
        .arg(seed.to_string())
        .arg("-i")
        .arg(image)
        .arg("-O")
        .arg(scratch)
        .arg("-a")
        .arg(bitrate_label(bitrate));
    let outcome = run(bin, &mut cmd).and_then(|()| {
        let name = image.file_name().ok_or_else(|| AtsError::io(image, not_a_file()))?;
        let produced = scratch.join(name);
        fs::rename(&produced, image).map_err(|e| AtsError::io(&produced, e))
    });
    // Clean up the scratch directory whether or not the tool succeeded.
    if let Err(e) = fs::remove_dir_all(scratch) {
        log::debug!("cannot remove {}: {e}", scratch.display());
    }
    outcome
}

/// Extract features of `image` into the fresh directory `out_dir`.
pub fn extract_features(
    config: &AtsConfig,
    extractor: FeatureExtractor,
    image: &Path,
    out_dir: &Path,
) -> Result<()> {
    let bin = config.extractor(extractor);
    ensure_tool(bin)?;
    fs::create_dir_all(out_dir).map_err(|e| AtsError::io(out_dir, e))?;
    let mut cmd = Command::new(bin);
    cmd.arg("-i").arg(image).arg("-O").arg(out_dir);
    run(bin, &mut cmd)
}

fn ensure_tool(bin: &Path) -> Result<()> {
    if bin.is_file() {
        Ok(())
    } else {
        Err(AtsError::ToolNotFound { path: bin.to_path_buf() })
    }
}

fn run(bin: &Path, cmd: &mut Command) -> Result<()> {
    log::trace!("running {cmd:?}");
    let output = cmd.output().map_err(|e| AtsError::ToolFailed {
        tool: bin.to_path_buf(),
        status: "not started".into(),
        stderr: e.to_string(),
    })?;
    if !output.status.success() {
        return Err(AtsError::ToolFailed {
            tool: bin.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn not_a_file() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
}

/// Delete a scratch file, logging instead of failing.
pub(crate) fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log::debug!("cannot remove {}: {e}", path.display());
    }
}

/// Sorted `*.pgm` files directly inside `dir`.
pub fn pgm_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AtsError::io(dir, e))? {
        let path = entry.map_err(|e| AtsError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "pgm") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_round_trip() {
        for name in ["HUGO", "WOW", "UNIW"] {
            let algo: EmbeddingAlgorithm = name.parse().unwrap();
            assert_eq!(algo.to_string(), name);
        }
        assert!(matches!("LSB".parse::<EmbeddingAlgorithm>(), Err(AtsError::UnknownAlgorithm(_))));
        assert!(matches!("PSRM".parse::<FeatureExtractor>(), Err(AtsError::UnknownExtractor(_))));
    }

    #[test]
    fn bitrate_formats() {
        assert_eq!(bitrate_label(0.4), "0.4");
        assert_eq!(bitrate_label(1.0), "1.0");
        assert_eq!(bitrate_code(0.4), "040");
        assert_eq!(bitrate_code(0.05), "005");
        assert_eq!(bitrate_code(1.0), "100");
    }

    #[test]
    fn seeds_are_reproducible_and_in_range() {
        let mut a = SeedSource::new(Some(9));
        let mut b = SeedSource::new(Some(9));
        for _ in 0..100 {
            let s = a.embed_seed();
            assert_eq!(s, b.embed_seed());
            assert!(s > i32::MIN);
            let t = a.tag();
            assert_eq!(t, b.tag());
            assert!((10_000_000..=99_999_999).contains(&t));
        }
    }

    #[test]
    fn missing_tool_reported() {
        let config = AtsConfig { hugo_bin: PathBuf::from("/nonexistent/HUGO"), ..AtsConfig::default() };
        let dir = tempfile::tempdir().unwrap();
        let err = hide_message(
            &config,
            EmbeddingAlgorithm::Hugo,
            &dir.path().join("x.pgm"),
            0.4,
            1,
            &dir.path().join("out"),
        )
        .unwrap_err();
        assert!(matches!(err, AtsError::ToolNotFound { .. }));
    }
}
