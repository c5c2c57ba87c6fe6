//! Tag classification into semantic versions.
//!
//! A tag participates in retention only if its name parses under the
//! semantic-version grammar. Everything else (`latest`, `edge`, digests,
//! typos) is invisible to the engine: never counted, never kept, never
//! deleted.

use std::cmp::Ordering;

use semver::Version;

/// A tag whose name parsed to a semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedTag {
    /// Tag name exactly as returned by the registry.
    pub name: String,
    /// Parsed version.
    pub version: Version,
}

impl VersionedTag {
    /// Returns true if this is a stable version (no pre-release identifiers).
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.version.pre.is_empty()
    }

    /// Compares by semver precedence, ignoring build metadata.
    ///
    /// Distinct tags can be precedence-equal (`1.4.0` vs `1.4.0+hotfix`);
    /// such tags form a tie-break group ordered chronologically.
    #[must_use]
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.version.cmp_precedence(&other.version)
    }
}

/// Valid tags partitioned by class, plus the names that failed the grammar.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// Tags with no pre-release identifiers.
    pub stable: Vec<VersionedTag>,
    /// Tags carrying pre-release identifiers.
    pub prerelease: Vec<VersionedTag>,
    /// Names that failed the semantic-version grammar, in input order.
    pub invalid: Vec<String>,
}

impl Classified {
    /// Returns true if no tag parsed to a version.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stable.is_empty() && self.prerelease.is_empty()
    }
}

/// Parses one tag name into a versioned tag.
///
/// Returns `None` when the name fails the semantic-version grammar. Pure
/// function; no side effects.
#[must_use]
pub fn classify(name: &str) -> Option<VersionedTag> {
    let version = Version::parse(name).ok()?;
    Some(VersionedTag {
        name: name.to_string(),
        version,
    })
}

/// Partitions raw tag names into stable and pre-release classes.
///
/// The output sequences preserve input order; ordering is the
/// [`order`](crate::order) module's job.
#[must_use]
pub fn classify_all(names: &[String]) -> Classified {
    let mut classified = Classified::default();
    for name in names {
        match classify(name) {
            Some(tag) if tag.is_stable() => classified.stable.push(tag),
            Some(tag) => classified.prerelease.push(tag),
            None => classified.invalid.push(name.clone()),
        }
    }
    classified
}
