// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # stegalign-core
//!
//! Domain adaptation for steganalysis. A detector trained on one image source
//! often fails on another; MA_PPD (manifold alignment with probability-based
//! pairing) projects both feature sets into one shared space before
//! classification:
//!
//! - **Graphs**: heat-kernel k-NN graphs per domain, the labelled source graph
//!   biased towards its known classes.
//! - **Correspondence**: source and target samples paired by the rank of
//!   their stego probability under an SVM trained on the source.
//! - **Embedding**: the smallest non-trivial Laplacian eigenvectors of the
//!   joint graph give both domains new coordinates.
//!
//! The `ats` module covers the surrounding Artificial Training Set workflow:
//! building labelled testing sets and A/B/C feature sets with external
//! embedding and SRM extraction tools, and classifying with ANOVA-selected
//! features.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use stegalign_core::{evaluate_adaptation, AlignConfig, FeatureTable, ManifoldAligner};
//!
//! let source = FeatureTable::load("source.csv").unwrap();
//! let target = FeatureTable::load("target.csv").unwrap();
//! let aligner = ManifoldAligner::new(AlignConfig::default());
//! let report = evaluate_adaptation(
//!     &aligner,
//!     source.features(),
//!     source.labels(),
//!     target.features(),
//!     target.labels(),
//! )
//! .unwrap();
//! println!("no DA: {}  DA: {}", report.baseline, report.adapted);
//! ```

pub mod align;
pub mod ats;
pub mod features;
pub mod graph;
pub mod svm;

pub use align::{
    accuracy, evaluate_adaptation, neighbors_for, AdaptationReport, AlignConfig, AlignError,
    Alignment, ManifoldAligner,
};
pub use features::{FeatureError, FeatureMatrix, FeatureTable, COVER, STEGO};
pub use graph::{build_adjacency, laplacian, LabelAffinity};
pub use svm::{Classifier, GridSearch, SvmError, SvmModel, SvmParams, Trainer};
