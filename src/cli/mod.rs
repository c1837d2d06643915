//! CLI module for the Mine Safety Officer
//!
//! - `serve`: run the HTTP API
//! - `ask`: answer one question through the cached pipeline and exit

pub mod ask;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Digital Mine Safety Officer - cached retrieval-augmented answers for mining safety
#[derive(Parser)]
#[command(name = "mine-safety-officer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),

    /// Answer a single question and print it
    Ask(ask::AskArgs),
}

/// Loads `.env` and layered configuration, then installs logging
///
/// Absent config files fall back to defaults; a source that is present but
/// invalid fails start-up.
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}
