//! # tagsweep-cli
//!
//! Command-line interface for registry tag pruning.
//!
//! ## Commands
//!
//! - `tagsweep prune` - Prune a single repository
//! - `tagsweep sweep` - Prune every repository in the catalog
//!
//! ## Configuration
//!
//! The CLI uses environment variables or command-line flags for settings:
//!
//! - `TAGSWEEP_REGISTRY` - Registry base URL (default: `http://localhost:5000`)
//! - `TAGSWEEP_USERNAME` - Basic auth username
//! - `TAGSWEEP_PASSWORD` - Basic auth password
//! - `TAGSWEEP_KEEP` - Version tags to keep per repository (default: 4)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
// CLI uses print! macros intentionally
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

pub mod commands;

use clap::{Parser, Subcommand};

/// Tagsweep CLI - registry tag pruning.
#[derive(Debug, Parser)]
#[command(name = "tagsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Registry base URL.
    #[arg(long, env = "TAGSWEEP_REGISTRY", default_value = "http://localhost:5000")]
    pub registry: String,

    /// Username for HTTP Basic authentication.
    #[arg(long, env = "TAGSWEEP_USERNAME")]
    pub username: Option<String>,

    /// Password for HTTP Basic authentication.
    #[arg(long, env = "TAGSWEEP_PASSWORD")]
    pub password: Option<String>,

    /// Number of version tags to keep per repository.
    #[arg(long, env = "TAGSWEEP_KEEP", default_value = "4")]
    pub keep: u32,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Compute and print the plan without deleting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the effective configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            registry: self.registry.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            keep: self.keep,
            format: self.format.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Prune a single repository.
    Prune(commands::prune::PruneArgs),
    /// Prune every repository in the catalog.
    Sweep(commands::sweep::SweepArgs),
}

/// Output format.
#[derive(Debug, Clone, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Registry base URL.
    pub registry: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Version tags to keep per repository.
    pub keep: u32,
    /// Output format.
    pub format: OutputFormat,
    /// Plan only; delete nothing.
    pub dry_run: bool,
}
