//! `convmap` command line: train the conversation pipeline and export cluster views.

mod commands;
mod config;
mod telemetry;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "convmap", version, about = "Embed, project and cluster conversation corpora")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train on the configured corpus and write a training summary.
    Train {
        /// TOML settings file; defaults to `train.toml` when present.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Train, then write one cluster visualization as JSON.
    Visualize {
        /// TOML settings file; defaults to `visualize.toml` when present.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Train { config } => commands::run_train(config),
        Command::Visualize { config } => commands::run_visualize(config),
    }
}
