// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Platt scaling: map decision values to class probabilities.
//!
//! Fits `P(y = +1 | f) = 1 / (1 + exp(A f + B))` by regularized maximum
//! likelihood with a Newton method and backtracking line search. Targets are
//! smoothed towards the class priors to avoid overfitting.

const MAX_ITERATIONS: usize = 100;
const MIN_STEP: f64 = 1e-10;
const SIGMA: f64 = 1e-12;
const GRADIENT_EPS: f64 = 1e-5;

/// Fitted sigmoid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sigmoid {
    pub a: f64,
    pub b: f64,
}

impl Sigmoid {
    /// Probability of the positive class for decision value `f`.
    pub fn probability(&self, f: f64) -> f64 {
        let z = f * self.a + self.b;
        if z >= 0.0 {
            (-z).exp() / (1.0 + (-z).exp())
        } else {
            1.0 / (1.0 + z.exp())
        }
    }

    /// Fit to decision values `dec` with targets `positive[i]`.
    pub fn fit(dec: &[f64], positive: &[bool]) -> Self {
        let prior1 = positive.iter().filter(|&&p| p).count() as f64;
        let prior0 = positive.len() as f64 - prior1;
        let hi = (prior1 + 1.0) / (prior1 + 2.0);
        let lo = 1.0 / (prior0 + 2.0);
        let targets: Vec<f64> = positive.iter().map(|&p| if p { hi } else { lo }).collect();

        let mut a = 0.0;
        let mut b = ((prior0 + 1.0) / (prior1 + 1.0)).ln();
        let mut fval = objective(dec, &targets, a, b);

        for iter in 0..MAX_ITERATIONS {
            let (mut h11, mut h22, mut h21) = (SIGMA, SIGMA, 0.0);
            let (mut g1, mut g2) = (0.0, 0.0);
            for (&d, &t) in dec.iter().zip(&targets) {
                let z = d * a + b;
                let (p, q) = if z >= 0.0 {
                    let e = (-z).exp();
                    (e / (1.0 + e), 1.0 / (1.0 + e))
                } else {
                    let e = z.exp();
                    (1.0 / (1.0 + e), e / (1.0 + e))
                };
                let d2 = p * q;
                h11 += d * d * d2;
                h22 += d2;
                h21 += d * d2;
                let d1 = t - p;
                g1 += d * d1;
                g2 += d1;
            }
            if g1.abs() < GRADIENT_EPS && g2.abs() < GRADIENT_EPS {
                break;
            }

            let det = h11 * h22 - h21 * h21;
            let da = -(h22 * g1 - h21 * g2) / det;
            let db = -(-h21 * g1 + h11 * g2) / det;
            let gd = g1 * da + g2 * db;

            let mut step = 1.0;
            while step >= MIN_STEP {
                let (na, nb) = (a + step * da, b + step * db);
                let nf = objective(dec, &targets, na, nb);
                if nf < fval + 1e-4 * step * gd {
                    a = na;
                    b = nb;
                    fval = nf;
                    break;
                }
                step /= 2.0;
            }
            if step < MIN_STEP {
                log::debug!("Platt line search failed at iteration {iter}");
                break;
            }
        }
        Sigmoid { a, b }
    }
}

/// Negative log-likelihood of the sigmoid `(a, b)` against soft targets.
fn objective(dec: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    dec.iter()
        .zip(targets)
        .map(|(&d, &t)| {
            let z = d * a + b;
            if z >= 0.0 {
                t * z + (1.0 + (-z).exp()).ln()
            } else {
                (t - 1.0) * z + (1.0 + z.exp()).ln()
            }
        })
        .sum()
}
