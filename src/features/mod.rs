// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Feature tables and feature-file readers.
//!
//! A feature table is a text file with one sample per line: comma-separated
//! numeric features followed by a trailing class token. The token decides the
//! label: any token containing `stego` is [`STEGO`], everything else is
//! [`COVER`]. The token itself never enters the feature vector.
//!
//! Row order is significant throughout the crate: the row index is the sample
//! identity used to correlate predictions, confidences and correspondences.
//!
//! Submodules cover the inputs of the ATS workflow: SRM feature directories
//! ([`srm`]), `labels.txt` bookkeeping ([`labels`]) and ANOVA feature
//! selection ([`selection`]).

pub mod error;
pub mod labels;
pub mod selection;
pub mod srm;

use std::path::Path;

use nalgebra::DMatrix;

pub use error::{FeatureError, Result};

/// Label of an unmodified image.
pub const COVER: u8 = 0;
/// Label of an image carrying an embedded payload.
pub const STEGO: u8 = 1;

/// Samples × features, row-major by meaning (rows are samples).
pub type FeatureMatrix = DMatrix<f64>;

/// A feature matrix with one binary label per row.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    features: FeatureMatrix,
    labels: Vec<u8>,
}

impl FeatureTable {
    /// Pair a feature matrix with its labels.
    ///
    /// # Errors
    /// [`FeatureError::Empty`] for a matrix without rows, and
    /// [`FeatureError::Parse`] when the label count differs from the row count.
    pub fn new(features: FeatureMatrix, labels: Vec<u8>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(FeatureError::Empty);
        }
        if labels.len() != features.nrows() {
            return Err(FeatureError::Parse {
                line: 0,
                message: format!(
                    "{} labels for {} feature rows",
                    labels.len(),
                    features.nrows()
                ),
            });
        }
        Ok(Self { features, labels })
    }

    /// Read and parse a feature table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| FeatureError::io(path, e))?;
        let table = Self::parse(&text)?;
        log::info!(
            "loaded {} samples x {} features from {}",
            table.n_samples(),
            table.dimension(),
            path.display()
        );
        Ok(table)
    }

    /// Parse the comma-separated feature format.
    ///
    /// Blank lines are ignored. Empty numeric fields (e.g. from a trailing
    /// comma before the label) are ignored, and a non-empty field that is not
    /// a number is skipped with a warning rather than rejected. Skipping can
    /// shorten a row, which is then caught by the dimensionality check.
    ///
    /// # Errors
    /// [`FeatureError::Parse`] for a line without a label token, a line with
    /// no numeric features, or a row whose dimensionality differs from the
    /// first row. [`FeatureError::Empty`] if no line holds a sample.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut labels = Vec::new();
        let mut dimension: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = raw.split(',').collect();
            let Some((token, numeric)) = fields.split_last().filter(|(_, n)| !n.is_empty())
            else {
                return Err(FeatureError::Parse {
                    line,
                    message: "expected numeric fields followed by a label token".into(),
                });
            };

            let mut row = Vec::with_capacity(numeric.len());
            for field in numeric {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                match field.parse::<f64>() {
                    Ok(v) => row.push(v),
                    Err(_) => log::warn!("line {line}: skipping malformed feature field {field:?}"),
                }
            }

            if row.is_empty() {
                return Err(FeatureError::Parse {
                    line,
                    message: "no numeric features before the label token".into(),
                });
            }
            match dimension {
                None => dimension = Some(row.len()),
                Some(d) if d != row.len() => {
                    return Err(FeatureError::Parse {
                        line,
                        message: format!("expected {d} features, found {}", row.len()),
                    });
                }
                Some(_) => {}
            }

            labels.push(label_from_token(token));
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(FeatureError::Empty);
        }
        Self::new(matrix_from_rows(&rows), labels)
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn dimension(&self) -> usize {
        self.features.ncols()
    }

    pub fn into_parts(self) -> (FeatureMatrix, Vec<u8>) {
        (self.features, self.labels)
    }
}

/// Map a class token to a label: anything mentioning `stego` is [`STEGO`].
pub fn label_from_token(token: &str) -> u8 {
    if token.contains("stego") {
        STEGO
    } else {
        COVER
    }
}

/// Build a matrix from equally long rows.
///
/// Callers guarantee every row has the length of the first one.
pub(crate) fn matrix_from_rows(rows: &[Vec<f64>]) -> FeatureMatrix {
    let ncols = rows.first().map_or(0, Vec::len);
    DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j])
}
