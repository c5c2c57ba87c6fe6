//! Sweep command - apply retention to every repository in the catalog.

use anyhow::Result;
use clap::Args;

use crate::{Config, OutputFormat};

/// Arguments for the sweep command.
#[derive(Debug, Args)]
pub struct SweepArgs {}

/// Execute the sweep command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be listed or any repository or
/// deletion failed.
pub async fn execute(_args: &SweepArgs, config: &Config) -> Result<()> {
    let pruner = super::build_pruner(config)?;

    if config.dry_run {
        let plans = pruner.plan_all().await?;
        match config.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = plans
                    .iter()
                    .map(|plan| {
                        serde_json::json!({
                            "repository": plan.repository,
                            "keep": plan.keep,
                            "delete": plan.delete,
                            "skipped": plan.skipped,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                for plan in &plans {
                    super::prune::print_plan(plan, &config.format)?;
                    println!();
                }
                println!("{} repositories planned", plans.len());
            }
        }
        return Ok(());
    }

    let sweep = pruner.prune_all().await?;

    match config.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "repositoriesProcessed": sweep.repositories_processed,
                    "repositoriesFailed": sweep.repositories_failed,
                    "tagsDeleted": sweep.tags_deleted,
                    "failures": sweep.failures,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Sweep completed");
            println!();
            println!("  Repositories processed: {}", sweep.repositories_processed);
            println!("  Repositories failed:    {}", sweep.repositories_failed);
            println!("  Tags deleted:           {}", sweep.tags_deleted);
            if !sweep.failures.is_empty() {
                println!("  Failures:");
                for failure in &sweep.failures {
                    println!("    {failure}");
                }
            }
        }
    }

    if sweep.has_failures() {
        anyhow::bail!("sweep finished with failures");
    }
    Ok(())
}
