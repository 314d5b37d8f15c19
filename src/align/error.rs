// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for manifold alignment.

use crate::svm::SvmError;

/// Errors that abort an alignment run. No partial embedding is ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    /// Two inputs that must agree in size do not.
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch { what: &'static str, expected: usize, found: usize },
    /// The eigensolver failed or was given a non-finite matrix.
    #[error("eigendecomposition failed: {0}")]
    Eigendecomposition(String),
    /// Fewer eigenvectors than requested survive the eigenvalue threshold.
    #[error("requested {requested} components but only {available} eigenvalues exceed the threshold")]
    InsufficientComponents { requested: usize, available: usize },
    /// A configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Training or applying the classifier failed.
    #[error("classifier: {0}")]
    Classifier(#[from] SvmError),
}

pub type Result<T> = std::result::Result<T, AlignError>;
