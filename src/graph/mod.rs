// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Graph construction over feature matrices.
//!
//! - [`knn`]: heat-kernel weighted k-nearest-neighbour adjacency, optionally
//!   biased by known labels.
//! - [`laplacian`]: the unnormalized Laplacian `D - W` of an adjacency matrix.

pub mod knn;
pub mod laplacian;

pub use knn::{build_adjacency, squared_distances, LabelAffinity};
pub use laplacian::laplacian;
