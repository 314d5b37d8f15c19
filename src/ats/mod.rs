// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Artificial Training Set (ATS) tooling.
//!
//! Drives the external embedding and SRM extraction binaries to build
//! labelled testing sets and the A/B/C feature sets, then classifies B.
//!
//! - [`config`]: tool paths and batch settings.
//! - [`tools`]: single tool invocations.
//! - [`pool`] / [`progress`]: bounded best-effort batches.
//! - [`testing_set`], [`abc`], [`classify`]: the three workflows.

pub mod abc;
pub mod classify;
pub mod config;
pub mod error;
pub mod pool;
pub mod progress;
pub mod testing_set;
pub mod tools;

pub use abc::{prepare_abc_sets, AbcSets};
pub use classify::{classify_abc, AbcVerdict};
pub use config::AtsConfig;
pub use error::AtsError;
pub use pool::{BatchReport, TaskOutcome, WorkerPool};
pub use progress::BatchProgress;
pub use testing_set::{gen_testing_set, TestingSet};
pub use tools::{EmbeddingAlgorithm, FeatureExtractor};
