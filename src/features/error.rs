// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for feature-file loading.

use std::path::PathBuf;

/// Errors that can occur while reading feature tables, SRM feature
/// directories or label files.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// The file or directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A line does not have the shape `f1,f2,...,fn,<label>`, or its
    /// dimensionality differs from the first row (1-based line number).
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    /// The input holds no samples.
    #[error("no samples in feature input")]
    Empty,
    /// An SRM feature directory is inconsistent across images.
    #[error("SRM features in {}: {message}", path.display())]
    Srm { path: PathBuf, message: String },
    /// A `labels.txt` line is not `name:0` or `name:1` (1-based line number).
    #[error("labels line {line}: {message}")]
    Labels { line: usize, message: String },
    /// A matrix does not have the feature count a fitted selector expects.
    #[error("expected {expected} feature columns, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl FeatureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
