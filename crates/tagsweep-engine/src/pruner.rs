//! Prune driver: decision, dispatch, and catalog iteration.

use std::sync::Arc;
use std::time::Instant;

use tagsweep_core::{Error, Registry, Result};

use crate::order::order_class;
use crate::policy::RetentionPolicy;
use crate::select::select_keep;
use crate::version::classify_all;

// =========================================================================
// Metrics (emitted via structured logging)
//
// Counters:
// - tagsweep_tags_deleted_total
// - tagsweep_delete_failures_total
//
// Histograms:
// - tagsweep_prune_duration_seconds
// =========================================================================

/// Outcome of deleting one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The tag's digest was deleted.
    Deleted,
    /// Deletion failed; the batch continued past it.
    Failed(String),
}

/// Dry-run plan for one repository.
///
/// Computed without side effects: no delete call is issued while planning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrunePlan {
    /// Repository the plan applies to.
    pub repository: String,
    /// Tag names that survive, sorted by name.
    pub keep: Vec<String>,
    /// Deletion candidates, oldest first.
    pub delete: Vec<String>,
    /// Names excluded from retention (failed the version grammar).
    pub skipped: Vec<String>,
}

/// Result of pruning one repository.
#[derive(Debug, Clone, Default)]
pub struct PruneResult {
    /// Repository that was pruned.
    pub repository: String,
    /// Total tags returned by the registry.
    pub considered: u64,
    /// Tags excluded from retention (failed the version grammar).
    pub skipped: u64,
    /// Size of the keep-set.
    pub kept: u64,
    /// Per-tag deletion outcomes, in dispatch order (oldest first).
    pub outcomes: Vec<(String, DeletionOutcome)>,
}

impl PruneResult {
    /// Number of tags actually deleted.
    #[must_use]
    pub fn deleted_count(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == DeletionOutcome::Deleted)
            .count() as u64
    }

    /// Formatted `tag: reason` lines for every failed deletion.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|(tag, o)| match o {
                DeletionOutcome::Deleted => None,
                DeletionOutcome::Failed(reason) => Some(format!("{tag}: {reason}")),
            })
            .collect()
    }

    /// Returns true if any deletion failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| matches!(o, DeletionOutcome::Failed(_)))
    }
}

/// Aggregate result of pruning every repository in the catalog.
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    /// Repositories pruned to completion (including partial delete failures).
    pub repositories_processed: u64,
    /// Repositories skipped because their tag list could not be fetched.
    pub repositories_failed: u64,
    /// Tags deleted across all repositories.
    pub tags_deleted: u64,
    /// Failures encountered, formatted `repository: detail`.
    pub failures: Vec<String>,
}

impl SweepResult {
    /// Folds one repository's result into the sweep tally.
    pub fn absorb(&mut self, result: &PruneResult) {
        self.repositories_processed += 1;
        self.tags_deleted += result.deleted_count();
        self.failures.extend(
            result
                .failures()
                .into_iter()
                .map(|f| format!("{}: {f}", result.repository)),
        );
    }

    /// Returns true if any repository or deletion failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.repositories_failed > 0 || !self.failures.is_empty()
    }
}

/// Retention-driven pruner for registry tags.
///
/// Holds the injected registry collaborator and a [`RetentionPolicy`].
/// The keep-set for a repository is fully computed before the first delete
/// for that repository is issued.
///
/// # Example
///
/// ```rust,ignore
/// let pruner = Pruner::new(registry, RetentionPolicy::default());
///
/// // Dry run first
/// let plan = pruner.plan_repository("app/api").await?;
///
/// // Actually prune
/// let result = pruner.prune_repository("app/api").await?;
/// ```
pub struct Pruner {
    registry: Arc<dyn Registry>,
    policy: RetentionPolicy,
}

impl Pruner {
    /// Creates a new pruner.
    #[must_use]
    pub fn new(registry: Arc<dyn Registry>, policy: RetentionPolicy) -> Self {
        Self { registry, policy }
    }

    /// Computes the retention decision for one repository without deleting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid policy (before any
    /// collaborator call) and [`Error::TagList`] if the repository's tags
    /// cannot be listed.
    pub async fn plan_repository(&self, repository: &str) -> Result<PrunePlan> {
        if let Some(message) = self.policy.validate() {
            return Err(Error::config(message));
        }

        let names = self.registry.list_tags(repository).await?;
        let classified = classify_all(&names);

        if !classified.invalid.is_empty() {
            tracing::debug!(
                repository,
                skipped = classified.invalid.len(),
                "ignoring tags without a version grammar"
            );
        }
        if classified.is_empty() {
            // Legitimate no-op, not an error.
            return Ok(PrunePlan {
                repository: repository.to_string(),
                skipped: classified.invalid,
                ..PrunePlan::default()
            });
        }

        let stable = order_class(self.registry.as_ref(), repository, classified.stable).await;
        let prerelease =
            order_class(self.registry.as_ref(), repository, classified.prerelease).await;

        let selection = select_keep(&stable, &prerelease, self.policy.keep);
        let delete = selection
            .merged
            .iter()
            .filter(|tag| !selection.keep.contains(&tag.name))
            .map(|tag| tag.name.clone())
            .collect();

        Ok(PrunePlan {
            repository: repository.to_string(),
            keep: selection.keep.into_iter().collect(),
            delete,
            skipped: classified.invalid,
        })
    }

    /// Prunes one repository: plans, then dispatches the deletions.
    ///
    /// Deletions are independent; a failed delete is recorded in the
    /// result and the batch continues. Nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Returns an error only for the failures that prevent a decision:
    /// invalid policy or an unavailable tag list.
    pub async fn prune_repository(&self, repository: &str) -> Result<PruneResult> {
        let start = Instant::now();
        let plan = self.plan_repository(repository).await?;

        tracing::info!(
            repository,
            keep = self.policy.keep,
            candidates = plan.delete.len(),
            metric = "tagsweep_prune_started",
            "starting prune"
        );

        let mut result = PruneResult {
            repository: repository.to_string(),
            considered: (plan.keep.len() + plan.delete.len() + plan.skipped.len()) as u64,
            skipped: plan.skipped.len() as u64,
            kept: plan.keep.len() as u64,
            outcomes: Vec::with_capacity(plan.delete.len()),
        };

        for tag in &plan.delete {
            match self.registry.delete_tag(repository, tag).await {
                Ok(()) => {
                    tracing::info!(repository, tag, "deleted tag");
                    result
                        .outcomes
                        .push((tag.clone(), DeletionOutcome::Deleted));
                }
                Err(e) => {
                    tracing::warn!(
                        repository,
                        tag,
                        error = %e,
                        metric = "tagsweep_delete_failures_total",
                        "delete failed, continuing"
                    );
                    result
                        .outcomes
                        .push((tag.clone(), DeletionOutcome::Failed(e.to_string())));
                }
            }
        }

        tracing::info!(
            repository,
            considered = result.considered,
            kept = result.kept,
            deleted = result.deleted_count(),
            failures = result.failures().len(),
            duration_secs = start.elapsed().as_secs_f64(),
            metric = "tagsweep_prune_completed",
            "prune completed"
        );

        Ok(result)
    }

    /// Computes retention decisions for every repository in the catalog.
    ///
    /// A repository whose plan fails is logged and skipped; the remaining
    /// repositories are still planned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid policy and
    /// [`Error::Catalog`] if the catalog cannot be listed.
    pub async fn plan_all(&self) -> Result<Vec<PrunePlan>> {
        if let Some(message) = self.policy.validate() {
            return Err(Error::config(message));
        }

        let repositories = self.registry.list_repositories().await?;
        let mut plans = Vec::with_capacity(repositories.len());
        for repository in repositories {
            match self.plan_repository(&repository).await {
                Ok(plan) => plans.push(plan),
                Err(e) => {
                    tracing::warn!(repository, error = %e, "skipping repository in plan");
                }
            }
        }
        Ok(plans)
    }

    /// Prunes every repository in the catalog.
    ///
    /// Each repository is processed independently; a failure in one is
    /// recorded in the sweep result and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid policy and
    /// [`Error::Catalog`] if the catalog cannot be listed.
    pub async fn prune_all(&self) -> Result<SweepResult> {
        if let Some(message) = self.policy.validate() {
            return Err(Error::config(message));
        }

        let start = Instant::now();
        let repositories = self.registry.list_repositories().await?;

        tracing::info!(
            repositories = repositories.len(),
            keep = self.policy.keep,
            metric = "tagsweep_sweep_started",
            "starting sweep"
        );

        let mut sweep = SweepResult::default();
        for repository in repositories {
            match self.prune_repository(&repository).await {
                Ok(result) => sweep.absorb(&result),
                Err(e) => {
                    tracing::error!(repository, error = %e, "repository failed, continuing");
                    sweep.repositories_failed += 1;
                    sweep.failures.push(format!("{repository}: {e}"));
                }
            }
        }

        tracing::info!(
            repositories_processed = sweep.repositories_processed,
            repositories_failed = sweep.repositories_failed,
            tags_deleted = sweep.tags_deleted,
            failures = sweep.failures.len(),
            duration_secs = start.elapsed().as_secs_f64(),
            metric = "tagsweep_sweep_completed",
            "sweep completed"
        );

        Ok(sweep)
    }
}
