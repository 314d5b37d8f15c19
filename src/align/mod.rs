// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Manifold-alignment domain adaptation (MA_PPD).
//!
//! A classifier trained on the labelled source domain ranks both domains by
//! stego probability; equal ranks are bridged in a joint k-NN graph whose
//! Laplacian eigenvectors give both domains coordinates in one space.
//!
//! - [`correspondence`]: confidence ranking and rank-matched pairs.
//! - [`aligner`]: joint graph, spectral embedding, [`ManifoldAligner`].
//! - [`evaluate`]: accuracy before and after alignment.

pub mod aligner;
pub mod correspondence;
pub mod error;
pub mod evaluate;

pub use aligner::{neighbors_for, spectral_embedding, AlignConfig, Alignment, ManifoldAligner};
pub use correspondence::{Correspondence, RankedSample, Ranking};
pub use error::AlignError;
pub use evaluate::{accuracy, evaluate_adaptation, AdaptationReport};
