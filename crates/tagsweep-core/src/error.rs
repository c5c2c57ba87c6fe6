//! Error types and result aliases for tagsweep.
//!
//! This module defines the shared error taxonomy used across all tagsweep
//! components. Errors are structured for programmatic handling: the caller
//! can tell a fatal configuration problem from a per-repository or per-tag
//! failure without string matching.

/// The result type used throughout tagsweep.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tagsweep operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The retention configuration is invalid.
    ///
    /// Raised before any collaborator call; nothing is processed.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of what made the configuration invalid.
        message: String,
    },

    /// The repository catalog could not be listed.
    ///
    /// Aborts a sweep; there is nothing to iterate.
    #[error("catalog unavailable: {message}")]
    Catalog {
        /// Description of the catalog failure.
        message: String,
    },

    /// The tag list for one repository could not be fetched.
    ///
    /// Aborts processing for that repository only.
    #[error("tag list unavailable for {repository}: {message}")]
    TagList {
        /// The repository whose tags could not be listed.
        repository: String,
        /// Description of the failure.
        message: String,
    },

    /// A tag could not be resolved to a content digest.
    #[error("digest resolution failed for {repository}:{tag}: {message}")]
    Digest {
        /// The repository holding the tag.
        repository: String,
        /// The tag being resolved.
        tag: String,
        /// Description of the failure.
        message: String,
    },

    /// Deleting one tag's digest failed.
    ///
    /// Per-tag; reported and tallied, never aborts the batch.
    #[error("delete failed for {repository}:{tag}: {message}")]
    Delete {
        /// The repository holding the tag.
        repository: String,
        /// The tag whose deletion failed.
        tag: String,
        /// Status code or reason reported by the registry.
        message: String,
    },

    /// A transport-level registry failure.
    #[error("registry error: {message}")]
    Registry {
        /// Description of the failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new catalog error.
    #[must_use]
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Creates a new tag list error for the given repository.
    #[must_use]
    pub fn tag_list(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TagList {
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new registry error with the given message.
    #[must_use]
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new registry error with a source cause.
    #[must_use]
    pub fn registry_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Registry {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
