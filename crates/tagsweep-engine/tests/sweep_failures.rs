//! Failure injection for the prune dispatcher and catalog iterator.
//!
//! # Invariants Tested
//!
//! 1. **Deletions are independent**: one failed delete never aborts the
//!    remaining deletions in the batch, and nothing is rolled back
//! 2. **Repositories are independent**: an unavailable tag list skips that
//!    repository only; the sweep continues
//! 3. **Catalog failure is fatal to the sweep**: with no catalog there is
//!    nothing to iterate

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use tagsweep_core::{Error, MemoryRegistry};
use tagsweep_engine::{DeletionOutcome, Pruner, RetentionPolicy};

#[tokio::test]
async fn failed_delete_does_not_abort_the_batch() {
    let registry = Arc::new(MemoryRegistry::new());
    for tag in ["1.0.0", "1.1.0", "1.2.0", "2.0.0"] {
        registry.push_tag("app/api", tag, None);
    }
    registry.fail_delete("app/api", "1.0.0");

    let pruner = Pruner::new(registry.clone(), RetentionPolicy::new(1));
    let result = pruner.prune_repository("app/api").await.expect("prune");

    // 1.0.0 failed; 1.1.0 and 1.2.0 were still deleted.
    assert_eq!(result.deleted_count(), 2);
    assert!(result.has_failures());
    assert_eq!(result.failures().len(), 1);
    assert!(result.failures()[0].starts_with("1.0.0"));
    assert_eq!(
        result.outcomes[0],
        (
            "1.0.0".to_string(),
            DeletionOutcome::Failed(
                "delete failed for app/api:1.0.0: injected delete failure".to_string()
            )
        )
    );

    let remaining = registry.tags("app/api");
    assert!(remaining.contains(&"1.0.0".to_string()));
    assert!(remaining.contains(&"2.0.0".to_string()));
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn unavailable_tag_list_skips_only_that_repository() {
    let registry = Arc::new(MemoryRegistry::new());
    registry.push_tag("app/api", "1.0.0", None);
    registry.push_tag("app/api", "1.1.0", None);
    registry.push_tag("app/web", "0.1.0", None);
    registry.push_tag("app/web", "0.2.0", None);
    registry.fail_tag_list("app/api");

    let pruner = Pruner::new(registry.clone(), RetentionPolicy::new(1));
    let sweep = pruner.prune_all().await.expect("sweep");

    assert_eq!(sweep.repositories_processed, 1);
    assert_eq!(sweep.repositories_failed, 1);
    assert_eq!(sweep.tags_deleted, 1);
    assert!(sweep.has_failures());
    assert!(sweep.failures[0].starts_with("app/api"));

    // app/api was untouched, app/web was pruned.
    assert_eq!(registry.tags("app/api").len(), 2);
    assert_eq!(registry.tags("app/web"), vec!["0.2.0"]);
}

#[tokio::test]
async fn catalog_failure_aborts_the_sweep() {
    let registry = Arc::new(MemoryRegistry::new());
    registry.push_tag("app/api", "1.0.0", None);
    registry.fail_catalog();

    let pruner = Pruner::new(registry.clone(), RetentionPolicy::new(1));
    let err = pruner.prune_all().await.unwrap_err();

    assert!(matches!(err, Error::Catalog { .. }));
    assert_eq!(registry.delete_call_count(), 0);
}

#[tokio::test]
async fn plan_all_skips_unlistable_repositories() {
    let registry = Arc::new(MemoryRegistry::new());
    registry.push_tag("app/api", "1.0.0", None);
    registry.push_tag("app/web", "0.1.0", None);
    registry.fail_tag_list("app/api");

    let pruner = Pruner::new(registry.clone(), RetentionPolicy::new(1));
    let plans = pruner.plan_all().await.expect("plan");

    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].repository, "app/web");
    assert_eq!(registry.delete_call_count(), 0);
}

#[tokio::test]
async fn every_delete_failing_still_reports_each_outcome() {
    let registry = Arc::new(MemoryRegistry::new());
    for tag in ["1.0.0", "1.1.0", "2.0.0"] {
        registry.push_tag("app/api", tag, None);
    }
    registry.fail_delete("app/api", "1.0.0");
    registry.fail_delete("app/api", "1.1.0");

    let pruner = Pruner::new(registry.clone(), RetentionPolicy::new(1));
    let result = pruner.prune_repository("app/api").await.expect("prune");

    assert_eq!(result.deleted_count(), 0);
    assert_eq!(result.failures().len(), 2);
    assert_eq!(registry.delete_call_count(), 2);
    assert_eq!(registry.tags("app/api").len(), 3);
}
