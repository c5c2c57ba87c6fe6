//! # tagsweep-engine
//!
//! Retention-decision engine for container registry tags.
//!
//! Given the raw tag names of a repository, the engine decides exactly which
//! tags survive and which are deleted:
//!
//! - **Classification**: tags are parsed as semantic versions; anything else
//!   (`latest`, build aliases) is excluded from retention entirely
//! - **Ordering**: versions order by semver precedence; tags whose versions
//!   are precedence-equal order chronologically via registry creation times
//! - **Selection**: two hard floors (newest stable, strictly-newer
//!   pre-release) layered over a slot-budgeted newest-first fill
//! - **Dispatch**: the complement of the keep-set is deleted through the
//!   [`Registry`](tagsweep_core::Registry) collaborator, tolerating partial
//!   failure
//!
//! ## Architecture
//!
//! ```text
//! tag names ──> version::classify_all ──> order::order_class (per class)
//!                                               │
//!                         select::select_keep <─┘
//!                                │
//!            pruner::Pruner ─────┴──> delete dispatch, per-tag outcomes
//! ```
//!
//! The engine performs no I/O of its own beyond the injected registry
//! collaborator; every decision is reproducible from the tag list and the
//! creation times.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagsweep_core::MemoryRegistry;
//! use tagsweep_engine::{Pruner, RetentionPolicy};
//!
//! let registry = Arc::new(MemoryRegistry::new());
//! let pruner = Pruner::new(registry, RetentionPolicy::default());
//!
//! // Dry run first
//! let plan = pruner.plan_repository("app/api").await?;
//! println!("would delete {} tags", plan.delete.len());
//!
//! // Actually prune
//! let result = pruner.prune_repository("app/api").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod order;
pub mod policy;
pub mod pruner;
pub mod select;
pub mod version;

// Re-export main types at crate root
pub use policy::RetentionPolicy;
pub use pruner::{DeletionOutcome, PrunePlan, PruneResult, Pruner, SweepResult};
pub use select::{KeepSet, Selection};
pub use version::VersionedTag;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::policy::RetentionPolicy;
    pub use crate::pruner::{DeletionOutcome, PrunePlan, PruneResult, Pruner, SweepResult};
    pub use crate::select::{KeepSet, Selection};
    pub use crate::version::VersionedTag;
}
