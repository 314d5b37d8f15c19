// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for ATS set preparation and classification.

use std::path::PathBuf;

use crate::features::FeatureError;
use crate::svm::SvmError;

/// Errors raised by the ATS tooling.
#[derive(Debug, thiserror::Error)]
pub enum AtsError {
    /// A filesystem operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A configured external tool does not exist.
    #[error("command not found: {}", path.display())]
    ToolNotFound { path: PathBuf },
    /// An external tool could not be started or exited unsuccessfully.
    #[error("{} failed ({status}): {stderr}", tool.display())]
    ToolFailed { tool: PathBuf, status: String, stderr: String },
    /// A required input directory does not exist.
    #[error("directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },
    /// An output directory that must be fresh already exists.
    #[error("directory already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },
    /// The embedding algorithm name is not one of HUGO, WOW, UNIW.
    #[error("unknown embedding algorithm: {0}")]
    UnknownAlgorithm(String),
    /// The feature extractor name is not RM.
    #[error("unknown feature extractor: {0}")]
    UnknownExtractor(String),
    /// The configuration file is unreadable or invalid.
    #[error("config: {0}")]
    Config(String),
    /// The worker pool could not be created.
    #[error("worker pool: {0}")]
    Pool(String),
    /// An image has no entry in the labels file.
    #[error("no label for image {name}")]
    MissingLabel { name: String },
    #[error(transparent)]
    Features(#[from] FeatureError),
    #[error(transparent)]
    Classifier(#[from] SvmError),
}

impl AtsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, AtsError>;
