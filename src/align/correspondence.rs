// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cross-domain correspondence by confidence rank.
//!
//! Each domain is ranked by the classifier's stego probability. The sample
//! at rank `r` in the source is paired with the sample at rank `r` in the
//! target. Domains with similar confidence distributions are assumed to
//! occupy similar positions on the manifold; nothing here looks at feature
//! space distances across domains.

use nalgebra::DMatrix;

use super::error::{AlignError, Result};

/// One sample in a ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedSample {
    /// Row of the sample in its original matrix.
    pub index: usize,
    pub probability: f64,
    pub predicted: u8,
}

/// Samples of one domain in ascending order of stego probability.
///
/// Equal probabilities keep ascending index order.
#[derive(Debug, Clone)]
pub struct Ranking {
    samples: Vec<RankedSample>,
}

impl Ranking {
    /// Rank samples given one probability and one predicted label each.
    ///
    /// # Errors
    /// [`AlignError::ShapeMismatch`] when the two slices differ in length.
    pub fn new(probabilities: &[f64], predicted: &[u8]) -> Result<Self> {
        if probabilities.len() != predicted.len() {
            return Err(AlignError::ShapeMismatch {
                what: "predicted labels",
                expected: probabilities.len(),
                found: predicted.len(),
            });
        }
        let mut samples: Vec<RankedSample> = probabilities
            .iter()
            .zip(predicted)
            .enumerate()
            .map(|(index, (&probability, &predicted))| RankedSample { index, probability, predicted })
            .collect();
        samples.sort_by(|a, b| a.probability.total_cmp(&b.probability).then(a.index.cmp(&b.index)));
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[RankedSample] {
        &self.samples
    }

    /// Original indices in rank order.
    pub fn order(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.index).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Rank-matched `(source_index, target_index)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correspondence {
    pairs: Vec<(usize, usize)>,
}

impl Correspondence {
    /// Pair equal ranks. Extra samples of the longer ranking stay unpaired.
    pub fn new(source: &Ranking, target: &Ranking) -> Self {
        let pairs = source
            .samples
            .iter()
            .zip(&target.samples)
            .map(|(s, t)| (s.index, t.index))
            .collect();
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Unweighted bridge matrix: entry `(s, t)` is 1 for every pair.
    pub fn bridge_matrix(&self, n_source: usize, n_target: usize) -> DMatrix<f64> {
        let mut w = DMatrix::zeros(n_source, n_target);
        for &(s, t) in &self.pairs {
            w[(s, t)] = 1.0;
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_ascending_with_index_tiebreak() {
        let r = Ranking::new(&[0.9, 0.1, 0.5, 0.1], &[1, 0, 1, 0]).unwrap();
        assert_eq!(r.order(), vec![1, 3, 2, 0]);
        assert_eq!(r.samples()[3].predicted, 1);
    }

    #[test]
    fn ranking_checks_lengths() {
        assert_eq!(
            Ranking::new(&[0.3, 0.7], &[0]).unwrap_err(),
            AlignError::ShapeMismatch { what: "predicted labels", expected: 2, found: 1 }
        );
    }

    #[test]
    fn pairs_equal_ranks() {
        let src = Ranking::new(&[0.2, 0.8, 0.5], &[0, 1, 1]).unwrap();
        let dst = Ranking::new(&[0.7, 0.6, 0.1], &[1, 1, 0]).unwrap();
        let c = Correspondence::new(&src, &dst);
        assert_eq!(c.pairs(), &[(0, 2), (2, 1), (1, 0)]);

        let w = c.bridge_matrix(3, 3);
        assert_eq!(w.sum(), 3.0);
        assert_eq!(w[(2, 1)], 1.0);
        assert_eq!(w[(1, 2)], 0.0);
    }

    #[test]
    fn each_source_sample_paired_once() {
        let p: Vec<f64> = (0..9).map(|i| ((i * 7) % 9) as f64 / 9.0).collect();
        let labels = vec![0; 9];
        let src = Ranking::new(&p, &labels).unwrap();
        let dst = Ranking::new(&p.iter().rev().copied().collect::<Vec<_>>(), &labels).unwrap();
        let c = Correspondence::new(&src, &dst);
        let mut seen: Vec<usize> = c.pairs().iter().map(|&(s, _)| s).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
    }
}
