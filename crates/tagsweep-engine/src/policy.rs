//! Retention policy configuration.

use serde::{Deserialize, Serialize};

/// Retention policy for version tags.
///
/// Controls how many version tags survive a prune pass per repository.
///
/// # Design Principles
///
/// - **Slot budget**: `keep` is the number of slots in the newest-first
///   fill; the selector stops adding tags once the budget is met
/// - **Hard floors**: the newest stable tag and a strictly-newer
///   pre-release are kept even when the budget is already exhausted, so
///   the keep-set can exceed `keep` by design
///
/// # Example
///
/// ```rust
/// use tagsweep_engine::RetentionPolicy;
///
/// // Use the default budget of 4
/// let policy = RetentionPolicy::default();
///
/// // Or customize
/// let policy = RetentionPolicy::new(8);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetentionPolicy {
    /// Number of version-tag slots to keep per repository.
    ///
    /// Must be positive; a zero budget is a configuration error and the
    /// engine refuses to run rather than delete everything.
    pub keep: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { keep: 4 }
    }
}

impl RetentionPolicy {
    /// Creates a new retention policy with the given slot budget.
    #[must_use]
    pub const fn new(keep: u32) -> Self {
        Self { keep }
    }

    /// Validates the policy settings.
    ///
    /// Returns an error message if validation fails.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.keep == 0 {
            return Some("keep must be at least 1".to_string());
        }
        None
    }
}
