//! Prune command - apply retention to one repository.

use anyhow::Result;
use clap::Args;

use tagsweep_engine::{PrunePlan, PruneResult};

use crate::{Config, OutputFormat};

/// Arguments for the prune command.
#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Repository (image) name to prune.
    #[arg(long, short = 'r')]
    pub repository: String,
}

/// Execute the prune command.
///
/// # Errors
///
/// Returns an error if the registry client cannot be built, the plan
/// cannot be computed, or any deletion failed.
pub async fn execute(args: PruneArgs, config: &Config) -> Result<()> {
    let pruner = super::build_pruner(config)?;

    if config.dry_run {
        let plan = pruner.plan_repository(&args.repository).await?;
        print_plan(&plan, &config.format)?;
        return Ok(());
    }

    let result = pruner.prune_repository(&args.repository).await?;
    print_result(&result, &config.format)?;

    if result.has_failures() {
        anyhow::bail!("{} deletion(s) failed", result.failures().len());
    }
    Ok(())
}

pub(crate) fn print_plan(plan: &PrunePlan, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "repository": plan.repository,
                    "keep": plan.keep,
                    "delete": plan.delete,
                    "skipped": plan.skipped,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Repository: {}", plan.repository);
            println!("  Keep:    {}", join_or_dash(&plan.keep));
            println!("  Delete:  {}", join_or_dash(&plan.delete));
            println!("  Skipped: {}", join_or_dash(&plan.skipped));
        }
    }
    Ok(())
}

pub(crate) fn print_result(result: &PruneResult, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "repository": result.repository,
                    "considered": result.considered,
                    "kept": result.kept,
                    "skipped": result.skipped,
                    "deleted": result.deleted_count(),
                    "failures": result.failures(),
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Repository: {}", result.repository);
            println!("  Considered: {}", result.considered);
            println!("  Kept:       {}", result.kept);
            println!("  Deleted:    {}", result.deleted_count());
            if result.has_failures() {
                println!("  Failures:");
                for failure in result.failures() {
                    println!("    {failure}");
                }
            }
        }
    }
    Ok(())
}

fn join_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
