// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for classifier training and prediction.

/// Errors that can occur while training or applying the SVM classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SvmError {
    /// No training samples were supplied.
    #[error("empty training set")]
    EmptyTrainingSet,
    /// The label count differs from the sample count.
    #[error("{rows} samples but {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },
    /// All training samples carry the same label.
    #[error("training set holds a single class")]
    SingleClass,
    /// A class has too few samples for stratified cross-validation.
    #[error("class {class} has {count} samples, at least 2 are needed")]
    TooFewSamples { class: u8, count: usize },
    /// A feature value is NaN or infinite.
    #[error("non-finite feature value")]
    NonFinite,
    /// Prediction input has a different feature count than the training data.
    #[error("expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// The hyperparameter grid is empty.
    #[error("empty hyperparameter grid")]
    EmptyGrid,
}

pub type Result<T> = std::result::Result<T, SvmError>;
