// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! foreman - concurrent task coordination demos

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{batch, counter, deadlock, logpipe};
use std::path::PathBuf;

use foreman_core::CoordinationConfig;

#[derive(Parser)]
#[command(
    name = "foreman",
    version,
    about = "Foreman - concurrent task coordination demos"
)]
struct Cli {
    /// Path to a TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shared counter demo (synchronized vs racy)
    Counter(counter::CounterArgs),
    /// Opposite-order lock acquisition demo
    Deadlock(deadlock::DeadlockArgs),
    /// Multi-producer log aggregation demo
    Logpipe(logpipe::LogpipeArgs),
    /// CPU-bound batch demo
    Batch(batch::BatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CoordinationConfig::load(path)?,
        None => CoordinationConfig::default(),
    };
    tracing::debug!(file = ?cli.config, "settings resolved");

    match cli.command {
        Commands::Counter(args) => counter::run(args).await,
        Commands::Deadlock(args) => deadlock::run(args, &config).await,
        Commands::Logpipe(args) => logpipe::run(args, &config).await,
        Commands::Batch(args) => batch::run(args, &config).await,
    }
}
