// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Tool locations and batch settings, optionally read from a TOML file.
//!
//! ```toml
//! hugo_bin = "/opt/dde/HUGO_like"
//! srm_bin = "/opt/dde/SRM"
//! workers = 8
//! seed = 42
//!
//! [grid]
//! costs = [1.0, 10.0]
//! folds = 3
//! ```
//!
//! Missing keys keep their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{AtsError, Result};
use super::tools::{EmbeddingAlgorithm, FeatureExtractor};
use crate::svm::GridSearch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtsConfig {
    pub hugo_bin: PathBuf,
    pub wow_bin: PathBuf,
    pub suniward_bin: PathBuf,
    pub srm_bin: PathBuf,
    /// Concurrent tool invocations.
    pub workers: usize,
    /// Seed for embedding keys and scratch names; random when unset.
    pub seed: Option<u64>,
    /// Feature columns kept before classification.
    pub selected_features: usize,
    /// SVM hyperparameter search used by the A/B/C classifier.
    pub grid: GridSearch,
}

impl Default for AtsConfig {
    fn default() -> Self {
        Self {
            hugo_bin: PathBuf::from("bin/HUGO_like"),
            wow_bin: PathBuf::from("bin/WOW"),
            suniward_bin: PathBuf::from("bin/S-UNIWARD"),
            srm_bin: PathBuf::from("bin/SRM"),
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            seed: None,
            selected_features: 500,
            grid: GridSearch::default(),
        }
    }
}

impl AtsConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AtsError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded ATS config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| AtsError::Config(e.to_string()))?;
        if config.workers == 0 {
            return Err(AtsError::Config("workers must be at least 1".into()));
        }
        let grid = &config.grid;
        if grid.costs.is_empty() || grid.gammas.is_empty() {
            return Err(AtsError::Config("grid costs and gammas must not be empty".into()));
        }
        if grid.costs.iter().chain(&grid.gammas).any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(AtsError::Config("grid costs and gammas must be positive".into()));
        }
        Ok(config)
    }

    pub fn embedder(&self, algorithm: EmbeddingAlgorithm) -> &Path {
        match algorithm {
            EmbeddingAlgorithm::Hugo => &self.hugo_bin,
            EmbeddingAlgorithm::Wow => &self.wow_bin,
            EmbeddingAlgorithm::SUniward => &self.suniward_bin,
        }
    }

    pub fn extractor(&self, extractor: FeatureExtractor) -> &Path {
        match extractor {
            FeatureExtractor::Rm => &self.srm_bin,
        }
    }
}
