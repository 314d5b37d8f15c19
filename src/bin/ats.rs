// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Artificial Training Set tooling.
//!
//! - `testing-set`: embed into a share of cover images, write labels.
//! - `abc`: extract A/B/C feature sets for a testing set.
//! - `classify`: train on A vs C, predict B.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use stegalign_core::ats::{
    classify_abc, gen_testing_set, prepare_abc_sets, AbcVerdict, AtsConfig, EmbeddingAlgorithm,
    FeatureExtractor,
};
use stegalign_core::STEGO;

#[derive(Parser)]
#[command(name = "ats", version)]
#[command(about = "Artificial Training Set preparation and classification")]
struct Cli {
    /// TOML file with tool paths and batch settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a labelled testing set from a directory of PGM covers
    TestingSet {
        cover_dir: PathBuf,
        /// Percentage of images that receive a payload
        perc: f64,
        output_dir: PathBuf,
        /// HUGO, WOW or UNIW
        algo: String,
        bitrate: f64,
    },
    /// Extract A/B/C feature sets for a testing set
    Abc {
        input_dir: PathBuf,
        output_dir: PathBuf,
        /// HUGO, WOW or UNIW
        algo: String,
        bitrate: f64,
        /// Feature extractor
        #[arg(long, default_value = "RM")]
        extractor: String,
    },
    /// Train on A (cover) vs C (stego) and classify B
    Classify {
        a: PathBuf,
        b: PathBuf,
        c: PathBuf,
        /// labels.txt of the testing set; prints accuracy instead of predictions
        labels: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<AtsConfig> {
    match path {
        Some(p) => AtsConfig::load(p)
            .with_context(|| format!("failed loading config {}", p.display())),
        None => Ok(AtsConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::TestingSet { cover_dir, perc, output_dir, algo, bitrate } => {
            let algorithm: EmbeddingAlgorithm = algo.parse()?;
            let set = gen_testing_set(&config, &cover_dir, perc, &output_dir, algorithm, bitrate)
                .context("testing set generation failed")?;
            println!("{}", set.dir.display());
            for name in set.embedding.failures() {
                eprintln!("embedding failed: {name}");
            }
        }
        Commands::Abc { input_dir, output_dir, algo, bitrate, extractor } => {
            let algorithm: EmbeddingAlgorithm = algo.parse()?;
            let extractor: FeatureExtractor = extractor.parse()?;
            let sets =
                prepare_abc_sets(&config, &input_dir, &output_dir, algorithm, bitrate, extractor)
                    .context("A/B/C preparation failed")?;
            for dir in [&sets.a, &sets.b, &sets.c] {
                println!("{}", dir.display());
            }
        }
        Commands::Classify { a, b, c, labels } => {
            let verdict = classify_abc(
                &config.grid,
                &a,
                &b,
                &c,
                labels.as_deref(),
                config.selected_features,
            )
            .context("classification failed")?;
            match verdict {
                AbcVerdict::Accuracy(acc) => println!("Accuracy: {acc}"),
                AbcVerdict::Predictions(list) => {
                    for (name, label) in list {
                        println!("{name} {}", if label == STEGO { "stego" } else { "cover" });
                    }
                }
            }
        }
    }
    Ok(())
}
