// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Sequential minimal optimization for the C-SVC dual problem.
//!
//! Solves
//!
//! ```text
//! min_a  0.5 a^T Q a - e^T a
//! s.t.   y^T a = 0,  0 <= a_t <= C
//! ```
//!
//! with `Q_ij = y_i y_j K(x_i, x_j)`. Each iteration picks the maximal
//! violating pair (first-order working set selection), solves the
//! two-variable subproblem analytically and clips it to the box. The bias
//! follows the usual rule: the mean of `y_t G_t` over free vectors, or the
//! midpoint of the feasible interval when no vector is free.

use nalgebra::DMatrix;

/// Floor for a non-positive curvature of the two-variable subproblem.
const TAU: f64 = 1e-12;

/// Output of the solver.
#[derive(Debug, Clone)]
pub struct SmoSolution {
    /// Dual coefficients, one per training sample, in `[0, C]`.
    pub alpha: Vec<f64>,
    /// Bias term: the decision value is `sum(alpha_t y_t K(x_t, x)) - rho`.
    pub rho: f64,
    /// Iterations performed.
    pub iterations: usize,
}

/// Default iteration cap for `n` samples.
pub fn default_max_iterations(n: usize) -> usize {
    100_000usize.max(n.saturating_mul(100))
}

/// Solve the dual for kernel matrix `k` and targets `y` (each `+1.0` or `-1.0`).
///
/// Stops when the maximal KKT violation drops below `tol` or after
/// `max_iter` iterations, whichever comes first.
pub fn solve(k: &DMatrix<f64>, y: &[f64], c: f64, tol: f64, max_iter: usize) -> SmoSolution {
    let n = y.len();
    let mut alpha = vec![0.0f64; n];
    let mut grad = vec![-1.0f64; n];

    let in_up = |a: f64, yt: f64| (yt > 0.0 && a < c) || (yt < 0.0 && a > 0.0);
    let in_low = |a: f64, yt: f64| (yt > 0.0 && a > 0.0) || (yt < 0.0 && a < c);

    let mut iterations = 0;
    while iterations < max_iter {
        let mut gmax = f64::NEG_INFINITY;
        let mut i = None;
        for t in 0..n {
            if in_up(alpha[t], y[t]) {
                let v = -y[t] * grad[t];
                if v > gmax {
                    gmax = v;
                    i = Some(t);
                }
            }
        }
        let mut gmin = f64::INFINITY;
        let mut j = None;
        for t in 0..n {
            if in_low(alpha[t], y[t]) {
                let v = -y[t] * grad[t];
                if v < gmin {
                    gmin = v;
                    j = Some(t);
                }
            }
        }
        let (i, j) = match (i, j) {
            (Some(i), Some(j)) if gmax - gmin >= tol => (i, j),
            _ => break,
        };

        let q_ij = y[i] * y[j] * k[(i, j)];
        let (old_i, old_j) = (alpha[i], alpha[j]);
        if y[i] != y[j] {
            let mut quad = k[(i, i)] + k[(j, j)] + 2.0 * q_ij;
            if quad <= 0.0 {
                quad = TAU;
            }
            let delta = (-grad[i] - grad[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;
            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = -diff;
            }
            if diff > 0.0 {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else if alpha[j] > c {
                alpha[j] = c;
                alpha[i] = c + diff;
            }
        } else {
            let mut quad = k[(i, i)] + k[(j, j)] - 2.0 * q_ij;
            if quad <= 0.0 {
                quad = TAU;
            }
            let delta = (grad[i] - grad[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;
            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
            } else if alpha[j] < 0.0 {
                alpha[j] = 0.0;
                alpha[i] = sum;
            }
            if sum > c {
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else if alpha[i] < 0.0 {
                alpha[i] = 0.0;
                alpha[j] = sum;
            }
        }

        let d_i = alpha[i] - old_i;
        let d_j = alpha[j] - old_j;
        for t in 0..n {
            grad[t] += y[t] * y[i] * k[(t, i)] * d_i + y[t] * y[j] * k[(t, j)] * d_j;
        }
        iterations += 1;
    }
    if iterations == max_iter {
        log::warn!("SMO stopped at the iteration cap ({max_iter})");
    }

    let rho = bias(&alpha, &grad, y, c);
    SmoSolution { alpha, rho, iterations }
}

fn bias(alpha: &[f64], grad: &[f64], y: &[f64], c: f64) -> f64 {
    let mut ub = f64::INFINITY;
    let mut lb = f64::NEG_INFINITY;
    let mut sum_free = 0.0;
    let mut n_free = 0usize;
    for t in 0..alpha.len() {
        let yg = y[t] * grad[t];
        if alpha[t] >= c {
            if y[t] < 0.0 {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else if alpha[t] <= 0.0 {
            if y[t] > 0.0 {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else {
            n_free += 1;
            sum_free += yg;
        }
    }
    if n_free > 0 {
        sum_free / n_free as f64
    } else {
        (ub + lb) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::kernel::Kernel;
    use approx::assert_relative_eq;

    fn decision(k: &DMatrix<f64>, sol: &SmoSolution, y: &[f64], t: usize) -> f64 {
        (0..y.len()).map(|s| sol.alpha[s] * y[s] * k[(s, t)]).sum::<f64>() - sol.rho
    }

    #[test]
    fn two_points_are_symmetric() {
        let rows = vec![vec![-1.0], vec![1.0]];
        let y = [-1.0, 1.0];
        let k = Kernel::Rbf { gamma: 0.5 }.gram(&rows);
        let sol = solve(&k, &y, 10.0, 1e-3, 1000);
        assert_relative_eq!(sol.alpha[0], sol.alpha[1], max_relative = 1e-9);
        assert!(sol.rho.abs() < 1e-9);
        assert!(decision(&k, &sol, &y, 0) < 0.0);
        assert!(decision(&k, &sol, &y, 1) > 0.0);
    }

    #[test]
    fn equality_constraint_and_box_hold() {
        let rows: Vec<Vec<f64>> = (0..12)
            .map(|t| vec![(t as f64 * 0.7).sin() + if t % 2 == 0 { 1.5 } else { -1.5 }])
            .collect();
        let y: Vec<f64> = (0..12).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let c = 0.5;
        let k = Kernel::Rbf { gamma: 1.0 }.gram(&rows);
        let sol = solve(&k, &y, c, 1e-3, default_max_iterations(12));
        let balance: f64 = sol.alpha.iter().zip(&y).map(|(a, yt)| a * yt).sum();
        assert!(balance.abs() < 1e-9);
        assert!(sol.alpha.iter().all(|&a| (0.0..=c).contains(&a)));
        for t in 0..12 {
            assert_eq!(decision(&k, &sol, &y, t) > 0.0, y[t] > 0.0, "sample {t}");
        }
    }

    #[test]
    fn iteration_cap_is_respected() {
        let rows = vec![vec![0.0], vec![0.1], vec![0.2], vec![0.3]];
        let y = [1.0, -1.0, 1.0, -1.0];
        let k = Kernel::Rbf { gamma: 1.0 }.gram(&rows);
        let sol = solve(&k, &y, 100.0, 1e-12, 3);
        assert!(sol.iterations <= 3);
    }
}
