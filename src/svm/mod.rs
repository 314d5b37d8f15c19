// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Binary support vector classification with calibrated probabilities.
//!
//! Labels use the crate convention: [`COVER`] (0) is the negative class and
//! [`STEGO`] (1) the positive class. A sample is predicted stego when its
//! decision value is strictly positive.
//!
//! - [`kernel`]: RBF kernel.
//! - [`smo`]: dual solver.
//! - [`platt`]: sigmoid calibration of decision values.
//! - [`grid`]: cross-validated hyperparameter search, the default [`Trainer`].

pub mod error;
pub mod grid;
pub mod kernel;
pub mod platt;
pub mod smo;

pub use error::SvmError;
pub use grid::{GridResult, GridSearch};
pub use kernel::{Kernel, KernelKind};
pub use platt::Sigmoid;

use nalgebra::DMatrix;

use crate::features::{COVER, STEGO};
use error::Result;

/// Default stopping tolerance of the dual solver.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// A fitted binary classifier over feature rows.
pub trait Classifier {
    /// Number of features the model expects per row.
    fn dimension(&self) -> usize;

    /// Predicted label ([`COVER`] or [`STEGO`]) for every row of `z`.
    fn predict(&self, z: &DMatrix<f64>) -> Result<Vec<u8>>;

    /// Probability of [`STEGO`] for every row of `z`.
    fn stego_probability(&self, z: &DMatrix<f64>) -> Result<Vec<f64>>;

    /// `[P(cover), P(stego)]` for every row of `z`.
    fn predict_proba(&self, z: &DMatrix<f64>) -> Result<Vec<[f64; 2]>> {
        Ok(self.stego_probability(z)?.into_iter().map(|p| [1.0 - p, p]).collect())
    }
}

/// Something that fits a [`Classifier`] from labelled rows.
pub trait Trainer {
    type Model: Classifier;

    fn fit(&self, x: &DMatrix<f64>, labels: &[u8]) -> Result<Self::Model>;
}

/// Hyperparameters of a single SVM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvmParams {
    pub c: f64,
    pub kernel: Kernel,
}

/// A trained C-SVC with a Platt sigmoid fitted on its training decisions.
#[derive(Debug, Clone)]
pub struct SvmModel {
    params: SvmParams,
    support: Vec<Vec<f64>>,
    coef: Vec<f64>,
    rho: f64,
    sigmoid: Sigmoid,
    dimension: usize,
}

impl SvmModel {
    /// Train on the rows of `x`.
    pub fn train(x: &DMatrix<f64>, labels: &[u8], params: SvmParams) -> Result<Self> {
        validate(x, labels)?;
        Ok(Self::train_rows(&matrix_rows(x), labels, params, DEFAULT_TOLERANCE))
    }

    /// Train on pre-validated rows. Both classes must be present.
    pub(crate) fn train_rows(
        rows: &[Vec<f64>],
        labels: &[u8],
        params: SvmParams,
        tol: f64,
    ) -> Self {
        let y: Vec<f64> = labels.iter().map(|&l| sign(l)).collect();
        let gram = params.kernel.gram(rows);
        let sol = smo::solve(&gram, &y, params.c, tol, smo::default_max_iterations(rows.len()));

        let mut support = Vec::new();
        let mut coef = Vec::new();
        for (t, &a) in sol.alpha.iter().enumerate() {
            if a > 0.0 {
                support.push(rows[t].clone());
                coef.push(a * y[t]);
            }
        }
        let dimension = rows.first().map_or(0, Vec::len);
        let mut model = SvmModel {
            params,
            support,
            coef,
            rho: sol.rho,
            sigmoid: Sigmoid { a: 0.0, b: 0.0 },
            dimension,
        };

        let dec: Vec<f64> = rows.iter().map(|r| model.decision(r)).collect();
        let positive: Vec<bool> = labels.iter().map(|&l| l == STEGO).collect();
        model.sigmoid = Sigmoid::fit(&dec, &positive);
        log::trace!(
            "SVM C={} {}: {} SVs, rho={:.6}, {} iterations",
            params.c,
            params.kernel,
            model.support.len(),
            model.rho,
            sol.iterations
        );
        model
    }

    /// Decision value of a single row.
    pub fn decision(&self, row: &[f64]) -> f64 {
        self.support
            .iter()
            .zip(&self.coef)
            .map(|(sv, &c)| c * self.params.kernel.eval(sv, row))
            .sum::<f64>()
            - self.rho
    }

    /// Decision values for every row of `z`.
    pub fn decision_function(&self, z: &DMatrix<f64>) -> Result<Vec<f64>> {
        self.check_dimension(z)?;
        Ok(matrix_rows(z).iter().map(|r| self.decision(r)).collect())
    }

    pub fn params(&self) -> SvmParams {
        self.params
    }

    pub fn support_vector_count(&self) -> usize {
        self.support.len()
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn sigmoid(&self) -> Sigmoid {
        self.sigmoid
    }

    fn check_dimension(&self, z: &DMatrix<f64>) -> Result<()> {
        if z.nrows() > 0 && z.ncols() != self.dimension {
            return Err(SvmError::DimensionMismatch { expected: self.dimension, found: z.ncols() });
        }
        Ok(())
    }
}

impl Classifier for SvmModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn predict(&self, z: &DMatrix<f64>) -> Result<Vec<u8>> {
        Ok(self
            .decision_function(z)?
            .into_iter()
            .map(|d| if d > 0.0 { STEGO } else { COVER })
            .collect())
    }

    fn stego_probability(&self, z: &DMatrix<f64>) -> Result<Vec<f64>> {
        Ok(self
            .decision_function(z)?
            .into_iter()
            .map(|d| self.sigmoid.probability(d))
            .collect())
    }
}

#[inline]
fn sign(label: u8) -> f64 {
    if label == STEGO {
        1.0
    } else {
        -1.0
    }
}

/// Copy the rows of a matrix into owned vectors.
pub(crate) fn matrix_rows(x: &DMatrix<f64>) -> Vec<Vec<f64>> {
    (0..x.nrows())
        .map(|i| (0..x.ncols()).map(|j| x[(i, j)]).collect())
        .collect()
}

/// Check a training set: non-empty, one label per row, finite, both classes.
pub(crate) fn validate(x: &DMatrix<f64>, labels: &[u8]) -> Result<()> {
    if x.nrows() == 0 {
        return Err(SvmError::EmptyTrainingSet);
    }
    if labels.len() != x.nrows() {
        return Err(SvmError::LengthMismatch { rows: x.nrows(), labels: labels.len() });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(SvmError::NonFinite);
    }
    let stego = labels.iter().filter(|&&l| l == STEGO).count();
    if stego == 0 || stego == labels.len() {
        return Err(SvmError::SingleClass);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> (DMatrix<f64>, Vec<u8>) {
        let x = DMatrix::from_row_slice(
            8,
            2,
            &[
                0.0, 0.0, 0.2, 0.1, -0.1, 0.3, 0.1, -0.2, //
                3.0, 3.0, 3.2, 2.9, 2.8, 3.1, 3.1, 3.3,
            ],
        );
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn separates_blobs() {
        let (x, y) = blobs();
        let params = SvmParams { c: 1.0, kernel: Kernel::Rbf { gamma: 0.5 } };
        let model = SvmModel::train(&x, &y, params).unwrap();
        assert_eq!(model.predict(&x).unwrap(), y);

        let p = model.stego_probability(&x).unwrap();
        assert!(p[..4].iter().all(|&v| v < 0.5));
        assert!(p[4..].iter().all(|&v| v > 0.5));
        let pp = model.predict_proba(&x).unwrap();
        assert!((pp[0][0] + pp[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_training_sets() {
        let (x, y) = blobs();
        let params = SvmParams { c: 1.0, kernel: Kernel::Rbf { gamma: 1.0 } };
        assert_eq!(
            SvmModel::train(&DMatrix::zeros(0, 2), &[], params).unwrap_err(),
            SvmError::EmptyTrainingSet
        );
        assert_eq!(
            SvmModel::train(&x, &y[..7], params).unwrap_err(),
            SvmError::LengthMismatch { rows: 8, labels: 7 }
        );
        assert_eq!(SvmModel::train(&x, &[1; 8], params).unwrap_err(), SvmError::SingleClass);
        let mut bad = x.clone();
        bad[(3, 1)] = f64::NAN;
        assert_eq!(SvmModel::train(&bad, &y, params).unwrap_err(), SvmError::NonFinite);
    }

    #[test]
    fn prediction_checks_dimension() {
        let (x, y) = blobs();
        let params = SvmParams { c: 1.0, kernel: Kernel::Rbf { gamma: 1.0 } };
        let model = SvmModel::train(&x, &y, params).unwrap();
        assert_eq!(
            model.predict(&DMatrix::zeros(2, 3)).unwrap_err(),
            SvmError::DimensionMismatch { expected: 2, found: 3 }
        );
    }
}
