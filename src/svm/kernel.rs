// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Kernel functions.

use core::fmt;

use nalgebra::DMatrix;

/// Kernel family, without its hyperparameters. Used to describe search grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelKind {
    Rbf,
}

impl KernelKind {
    pub fn with_gamma(self, gamma: f64) -> Kernel {
        match self {
            Self::Rbf => Kernel::Rbf { gamma },
        }
    }
}

/// A kernel with its hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// Gaussian radial basis function `exp(-gamma * ||a - b||^2)`.
    Rbf { gamma: f64 },
}

impl Kernel {
    #[inline]
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            Self::Rbf { gamma } => {
                let d: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * d).exp()
            }
        }
    }

    /// Full kernel matrix over a set of samples.
    pub fn gram(&self, rows: &[Vec<f64>]) -> DMatrix<f64> {
        let n = rows.len();
        let mut k = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let v = self.eval(&rows[i], &rows[j]);
                k[(i, j)] = v;
                k[(j, i)] = v;
            }
        }
        k
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rbf { gamma } => write!(f, "rbf(gamma={gamma})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rbf_values() {
        let k = KernelKind::Rbf.with_gamma(0.5);
        assert_eq!(k.eval(&[1.0, 2.0], &[1.0, 2.0]), 1.0);
        assert_relative_eq!(k.eval(&[0.0, 0.0], &[1.0, 1.0]), (-1.0f64).exp());
    }

    #[test]
    fn gram_is_symmetric_with_unit_diagonal() {
        let rows = vec![vec![0.0], vec![1.0], vec![3.0]];
        let g = Kernel::Rbf { gamma: 0.1 }.gram(&rows);
        assert_eq!(g, g.transpose());
        for i in 0..3 {
            assert_eq!(g[(i, i)], 1.0);
        }
    }
}
