//! CLI subcommands.

pub mod prune;
pub mod sweep;

use std::sync::Arc;

use anyhow::{Context, Result};

use tagsweep_engine::{Pruner, RetentionPolicy};
use tagsweep_registry::{DistributionClient, RegistryConfig};

use crate::Config;

/// Builds a pruner wired to the configured registry endpoint.
pub(crate) fn build_pruner(config: &Config) -> Result<Pruner> {
    let client = DistributionClient::new(RegistryConfig {
        base_url: config.registry.clone(),
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .context("Failed to create registry client")?;

    Ok(Pruner::new(
        Arc::new(client),
        RetentionPolicy::new(config.keep),
    ))
}
