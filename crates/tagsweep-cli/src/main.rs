//! Tagsweep CLI - registry tag pruning.
//!
//! The main entry point for the `tagsweep` binary.

use anyhow::Result;
use clap::Parser;

use tagsweep_cli::{Cli, Commands};
use tagsweep_core::{LogFormat, init_logging};

fn main() -> Result<()> {
    init_logging(LogFormat::Pretty);

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = cli.config();

    // Create runtime and execute
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Prune(args) => tagsweep_cli::commands::prune::execute(args, &config).await,
            Commands::Sweep(args) => tagsweep_cli::commands::sweep::execute(&args, &config).await,
        }
    })
}
