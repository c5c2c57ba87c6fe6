//! Version ordering with chronological tie-breaks.
//!
//! Semver precedence is authoritative between distinct versions; creation
//! time is consulted only *inside* groups of precedence-equal tags, so a
//! skewed registry clock can never reorder versions. Timestamps are fetched
//! lazily: a group of size 1 costs no collaborator round-trip.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use tagsweep_core::Registry;

use crate::version::VersionedTag;

/// Sentinel for tags whose creation time is unknown or unreadable.
///
/// Unknown-age duplicates sort oldest and are therefore the first deletion
/// candidates. This bias is a policy choice: a tag whose metadata cannot be
/// read loses the tie rather than winning it.
fn oldest_sentinel() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

/// Orders one class of tags ascending (oldest first).
///
/// Primary key: semver precedence. Within exact-precedence groups the
/// order is chronological via [`Registry::creation_time`], with tag name
/// as the final deterministic fallback.
pub async fn order_class(
    registry: &dyn Registry,
    repository: &str,
    mut tags: Vec<VersionedTag>,
) -> Vec<VersionedTag> {
    tags.sort_by(|a, b| a.cmp_precedence(b).then_with(|| a.name.cmp(&b.name)));

    let mut ordered = Vec::with_capacity(tags.len());
    let mut start = 0;
    while start < tags.len() {
        let mut end = start + 1;
        while end < tags.len() && tags[start].cmp_precedence(&tags[end]) == Ordering::Equal {
            end += 1;
        }

        if end - start == 1 {
            ordered.push(tags[start].clone());
        } else {
            ordered.extend(resolve_ties(registry, repository, &tags[start..end]).await);
        }
        start = end;
    }
    ordered
}

/// Orders one precedence-equal group oldest-to-newest by creation time.
async fn resolve_ties(
    registry: &dyn Registry,
    repository: &str,
    group: &[VersionedTag],
) -> Vec<VersionedTag> {
    let mut stamped: Vec<(DateTime<Utc>, VersionedTag)> = Vec::with_capacity(group.len());

    for tag in group {
        let created = match registry.creation_time(repository, &tag.name).await {
            Ok(Some(ts)) => ts,
            Ok(None) => oldest_sentinel(),
            Err(e) => {
                tracing::warn!(
                    repository,
                    tag = %tag.name,
                    error = %e,
                    "creation time unavailable, treating tag as oldest"
                );
                oldest_sentinel()
            }
        };
        stamped.push((created, tag.clone()));
    }

    stamped.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));
    stamped.into_iter().map(|(_, tag)| tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tagsweep_core::MemoryRegistry;

    use crate::version::classify;

    fn tag(name: &str) -> VersionedTag {
        classify(name).expect("valid tag")
    }

    #[tokio::test]
    async fn distinct_versions_skip_timestamp_fetch() {
        let registry = MemoryRegistry::new();
        let ordered = order_class(
            &registry,
            "app/api",
            vec![tag("2.0.0"), tag("1.0.0"), tag("1.5.0")],
        )
        .await;

        let names: Vec<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["1.0.0", "1.5.0", "2.0.0"]);
        assert!(registry.creation_time_calls().is_empty());
    }

    #[tokio::test]
    async fn equal_versions_order_oldest_first() {
        let registry = MemoryRegistry::new();
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        registry.push_tag("app/api", "1.0.0+build2", Some(older));
        registry.push_tag("app/api", "1.0.0+build1", Some(newer));

        let ordered = order_class(
            &registry,
            "app/api",
            vec![tag("1.0.0+build1"), tag("1.0.0+build2")],
        )
        .await;

        let names: Vec<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
        // build2 was pushed first, so it sorts oldest despite its name.
        assert_eq!(names, vec!["1.0.0+build2", "1.0.0+build1"]);
        assert_eq!(registry.creation_time_calls().len(), 2);
    }

    #[tokio::test]
    async fn unknown_timestamp_sorts_oldest() {
        let registry = MemoryRegistry::new();
        let known = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        registry.push_tag("app/api", "1.0.0", Some(known));
        registry.push_tag("app/api", "1.0.0+rebuild", None);

        let ordered = order_class(
            &registry,
            "app/api",
            vec![tag("1.0.0"), tag("1.0.0+rebuild")],
        )
        .await;

        let names: Vec<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["1.0.0+rebuild", "1.0.0"]);
    }

    #[tokio::test]
    async fn timestamps_never_reorder_distinct_versions() {
        let registry = MemoryRegistry::new();
        // 2.0.0 is "older" than 1.0.0 on the clock; precedence still wins.
        let older = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        registry.push_tag("app/api", "2.0.0", Some(older));
        registry.push_tag("app/api", "1.0.0", Some(newer));

        let ordered = order_class(&registry, "app/api", vec![tag("2.0.0"), tag("1.0.0")]).await;

        let names: Vec<&str> = ordered.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["1.0.0", "2.0.0"]);
    }
}
