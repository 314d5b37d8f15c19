// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! MA_PPD domain adaptation on two feature files.
//!
//! Prints the target accuracy of an SVM trained on the raw source features
//! and of one trained on the aligned source embedding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use stegalign_core::{evaluate_adaptation, neighbors_for, AlignConfig, FeatureTable, ManifoldAligner};

#[derive(Parser)]
#[command(name = "ma-ppd", version)]
#[command(about = "Manifold-alignment domain adaptation for steganalysis features")]
struct Cli {
    /// Labelled source feature file (training domain)
    source: PathBuf,
    /// Target feature file (deployment domain); labels are only used for scoring
    target: PathBuf,
    /// Embedding dimensions
    #[arg(long, default_value_t = 2)]
    dimensions: usize,
    /// Neighbours per sample; defaults to round(sqrt(source samples))
    #[arg(long)]
    neighbors: Option<usize>,
    /// Eigenvalues below this are discarded
    #[arg(long, default_value_t = 1e-8)]
    eps: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let source = FeatureTable::load(&cli.source)
        .with_context(|| format!("failed loading source features {}", cli.source.display()))?;
    let target = FeatureTable::load(&cli.target)
        .with_context(|| format!("failed loading target features {}", cli.target.display()))?;

    let config = AlignConfig {
        dimensions: cli.dimensions,
        neighbors: cli.neighbors.unwrap_or_else(|| neighbors_for(source.n_samples())),
        eps: cli.eps,
        ..AlignConfig::default()
    };
    log::info!("aligning with d={} k={}", config.dimensions, config.neighbors);

    let aligner = ManifoldAligner::new(config);
    let report = evaluate_adaptation(
        &aligner,
        source.features(),
        source.labels(),
        target.features(),
        target.labels(),
    )
    .context("domain adaptation failed")?;

    println!("no DA: {}  DA: {}", report.baseline, report.adapted);
    Ok(())
}
