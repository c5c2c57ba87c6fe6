//! Registry collaborator abstraction.
//!
//! This module defines the narrow interface the retention engine uses to
//! talk to a container registry. The contract is fixed; the transport is
//! not. The production implementation speaks the Docker Registry HTTP API
//! v2 (`tagsweep-registry`), and [`MemoryRegistry`] provides an in-memory
//! fake so the engine is fully unit-testable without a network.
//!
//! ## Contract Notes
//!
//! - `creation_time` is best-effort: `Ok(None)` is a valid, non-error
//!   outcome. Callers degrade missing timestamps, they do not fail.
//! - `delete_tag` targets the tag's content digest internally; the
//!   tag-to-digest mapping is not itself a deletable resource in the
//!   registry wire protocol.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// The registry operations the retention engine consumes.
///
/// All implementations must be safe to share across tasks; the engine holds
/// the registry behind an `Arc<dyn Registry>`.
#[async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Lists all repository names in the registry catalog.
    ///
    /// Fails with [`Error::Catalog`] if the registry cannot be reached or
    /// authenticated.
    async fn list_repositories(&self) -> Result<Vec<String>>;

    /// Lists all tag names in one repository.
    ///
    /// Fails with [`Error::TagList`] for that repository only.
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>>;

    /// Fetches the creation time of one tag, best-effort.
    ///
    /// `Ok(None)` means the timestamp is unknown; this is not an error.
    async fn creation_time(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<Option<DateTime<Utc>>>;

    /// Deletes one tag by resolving it to a content digest and deleting
    /// the digest.
    ///
    /// Fails with [`Error::Digest`] or [`Error::Delete`]; both are per-tag
    /// failures the caller tallies without aborting the batch.
    async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()>;
}

// ============================================================================
// MemoryRegistry - In-memory fake for tests
// ============================================================================

/// In-memory registry fake for testing.
///
/// Thread-safe via `RwLock`. Not suitable for production. Supports failure
/// injection (catalog, per-repository tag listing, per-tag deletion) and
/// records every delete and timestamp-fetch call so tests can assert on
/// collaborator traffic, not just on outcomes.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    /// repository -> tag -> creation time (None = unknown).
    repositories: BTreeMap<String, BTreeMap<String, Option<DateTime<Utc>>>>,
    delete_calls: Vec<(String, String)>,
    deleted: Vec<(String, String)>,
    creation_time_calls: Vec<(String, String)>,
    fail_catalog: bool,
    fail_tag_list: HashSet<String>,
    fail_delete: HashSet<(String, String)>,
}

impl MemoryRegistry {
    /// Creates a new empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag to a repository, creating the repository if needed.
    pub fn push_tag(&self, repository: &str, tag: &str, created: Option<DateTime<Utc>>) {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner
            .repositories
            .entry(repository.to_string())
            .or_default()
            .insert(tag.to_string(), created);
    }

    /// Configures the catalog listing to fail.
    pub fn fail_catalog(&self) {
        self.inner.write().expect("lock poisoned").fail_catalog = true;
    }

    /// Configures tag listing for the given repository to fail.
    pub fn fail_tag_list(&self, repository: &str) {
        self.inner
            .write()
            .expect("lock poisoned")
            .fail_tag_list
            .insert(repository.to_string());
    }

    /// Configures deletion of the given tag to fail.
    pub fn fail_delete(&self, repository: &str, tag: &str) {
        self.inner
            .write()
            .expect("lock poisoned")
            .fail_delete
            .insert((repository.to_string(), tag.to_string()));
    }

    /// Returns the tags currently present in a repository.
    #[must_use]
    pub fn tags(&self, repository: &str) -> Vec<String> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .repositories
            .get(repository)
            .map(|tags| tags.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns every `(repository, tag)` delete successfully applied.
    #[must_use]
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.inner.read().expect("lock poisoned").deleted.clone()
    }

    /// Returns the number of delete calls attempted, including failures.
    #[must_use]
    pub fn delete_call_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").delete_calls.len()
    }

    /// Returns every `(repository, tag)` timestamp fetch attempted.
    #[must_use]
    pub fn creation_time_calls(&self) -> Vec<(String, String)> {
        self.inner
            .read()
            .expect("lock poisoned")
            .creation_time_calls
            .clone()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Error::registry("lock poisoned"))?;

        if inner.fail_catalog {
            return Err(Error::catalog("injected catalog failure"));
        }
        Ok(inner.repositories.keys().cloned().collect())
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| Error::registry("lock poisoned"))?;

        if inner.fail_tag_list.contains(repository) {
            return Err(Error::tag_list(repository, "injected tag list failure"));
        }
        Ok(inner
            .repositories
            .get(repository)
            .map(|tags| tags.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn creation_time(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Error::registry("lock poisoned"))?;

        inner
            .creation_time_calls
            .push((repository.to_string(), tag.to_string()));
        Ok(inner
            .repositories
            .get(repository)
            .and_then(|tags| tags.get(tag))
            .copied()
            .flatten())
    }

    async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| Error::registry("lock poisoned"))?;

        inner
            .delete_calls
            .push((repository.to_string(), tag.to_string()));

        if inner
            .fail_delete
            .contains(&(repository.to_string(), tag.to_string()))
        {
            return Err(Error::Delete {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: "injected delete failure".to_string(),
            });
        }

        let removed = inner
            .repositories
            .get_mut(repository)
            .and_then(|tags| tags.remove(tag));
        if removed.is_none() {
            return Err(Error::Digest {
                repository: repository.to_string(),
                tag: tag.to_string(),
                message: "tag not found".to_string(),
            });
        }

        inner
            .deleted
            .push((repository.to_string(), tag.to_string()));
        Ok(())
    }
}
