//! Slot-budgeted keep-set selection.
//!
//! The policy core: two explicit floor steps followed by a bounded fill
//! loop. The floors are hard guarantees layered on top of the budget, not
//! branches inside a comparator, so each step is independently auditable
//! and testable.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::version::VersionedTag;

/// The set of tag names a prune pass preserves.
///
/// Built incrementally and never shrinks once a tag is added.
pub type KeepSet = BTreeSet<String>;

/// Outcome of keep-selection over one repository's ordered classes.
///
/// Carries the merged sequence the fill walked so the caller derives the
/// delete list from the same ordering the keep-set was chosen from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Tag names that survive the pass.
    pub keep: KeepSet,
    /// Both classes merged ascending by precedence (oldest first); the
    /// complement of `keep` within this sequence is the delete list.
    pub merged: Vec<VersionedTag>,
}

/// Selects the tags to keep from one repository's ordered classes.
///
/// `stable` and `prerelease` must each be ascending (oldest first) as
/// produced by [`order_class`](crate::order::order_class). `keep` must be
/// positive; the caller validates the policy before reaching this point.
///
/// Selection steps:
///
/// 1. The newest stable tag is kept unconditionally.
/// 2. The newest pre-release is kept if no stable exists or its version is
///    strictly greater than the newest stable's.
/// 3. Both classes merge into one sequence by version precedence and are
///    walked newest-first, filling the keep-set until it has `keep` tags.
///
/// The keep-set can exceed `keep`: losing the only stable release or a
/// strictly-newer pre-release would be worse than retaining one extra tag.
#[must_use]
pub fn select_keep(stable: &[VersionedTag], prerelease: &[VersionedTag], keep: u32) -> Selection {
    let mut kept = KeepSet::new();

    // Floor 1: the newest stable always survives.
    if let Some(latest_stable) = stable.last() {
        kept.insert(latest_stable.name.clone());
    }

    // Floor 2: a pre-release ahead of every stable is never dropped.
    if let Some(latest_pre) = prerelease.last() {
        let ahead = stable
            .last()
            .map_or(true, |s| latest_pre.cmp_precedence(s) == Ordering::Greater);
        if ahead {
            kept.insert(latest_pre.name.clone());
        }
    }

    // Bounded fill: newest-first across both classes until the budget is met.
    let merged = merge_by_precedence(stable, prerelease);
    for tag in merged.iter().rev() {
        if kept.len() >= keep as usize {
            break;
        }
        kept.insert(tag.name.clone());
    }

    Selection { keep: kept, merged }
}

/// Merges two ascending classes into one ascending sequence by precedence.
///
/// Chronological order inside precedence-equal groups is preserved. A
/// stable and a pre-release tag can never be precedence-equal (pre-release
/// identifiers always lower precedence), so groups never span classes.
#[must_use]
pub fn merge_by_precedence(
    stable: &[VersionedTag],
    prerelease: &[VersionedTag],
) -> Vec<VersionedTag> {
    let mut merged = Vec::with_capacity(stable.len() + prerelease.len());
    let (mut i, mut j) = (0, 0);

    while i < stable.len() && j < prerelease.len() {
        if stable[i].cmp_precedence(&prerelease[j]) == Ordering::Less {
            merged.push(stable[i].clone());
            i += 1;
        } else {
            merged.push(prerelease[j].clone());
            j += 1;
        }
    }
    merged.extend_from_slice(&stable[i..]);
    merged.extend_from_slice(&prerelease[j..]);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::classify;

    fn tags(names: &[&str]) -> Vec<VersionedTag> {
        names.iter().map(|n| classify(n).expect("valid tag")).collect()
    }

    #[test]
    fn budget_drops_oldest() {
        let stable = tags(&["1.0.0", "1.1.0", "2.0.0"]);
        let kept = select_keep(&stable, &[], 2).keep;

        assert_eq!(kept.len(), 2);
        assert!(kept.contains("2.0.0"));
        assert!(kept.contains("1.1.0"));
        assert!(!kept.contains("1.0.0"));
    }

    #[test]
    fn newest_stable_kept_for_every_budget() {
        let stable = tags(&["0.9.0", "1.0.0", "1.1.0", "2.0.0"]);
        for keep in 1..=5 {
            let kept = select_keep(&stable, &[], keep).keep;
            assert!(kept.contains("2.0.0"), "keep={keep}");
        }
    }

    #[test]
    fn newer_prerelease_floor_exceeds_budget() {
        let stable = tags(&["1.0.0"]);
        let prerelease = tags(&["2.0.0-rc.1"]);
        let kept = select_keep(&stable, &prerelease, 1).keep;

        // Both floors trigger; the set exceeds the budget by design.
        assert_eq!(kept.len(), 2);
        assert!(kept.contains("1.0.0"));
        assert!(kept.contains("2.0.0-rc.1"));
    }

    #[test]
    fn older_prerelease_gets_no_floor() {
        let stable = tags(&["2.0.0"]);
        let prerelease = tags(&["1.0.0-rc.1"]);
        let kept = select_keep(&stable, &prerelease, 1).keep;

        assert_eq!(kept.len(), 1);
        assert!(kept.contains("2.0.0"));
    }

    #[test]
    fn no_stables_keeps_newest_prerelease() {
        let prerelease = tags(&["1.0.0-alpha", "1.0.0-beta"]);
        let kept = select_keep(&[], &prerelease, 1).keep;

        assert!(kept.contains("1.0.0-beta"));
    }

    #[test]
    fn classes_interleave_by_version_in_fill() {
        let stable = tags(&["1.0.0", "2.0.0"]);
        let prerelease = tags(&["1.5.0-rc.1", "3.0.0-rc.1"]);
        let kept = select_keep(&stable, &prerelease, 3).keep;

        // Newest-first fill: 3.0.0-rc.1, 2.0.0, then 1.5.0-rc.1.
        assert!(kept.contains("3.0.0-rc.1"));
        assert!(kept.contains("2.0.0"));
        assert!(kept.contains("1.5.0-rc.1"));
        assert!(!kept.contains("1.0.0"));
    }

    #[test]
    fn fewer_tags_than_budget_keeps_all() {
        let stable = tags(&["1.0.0", "1.1.0"]);
        let kept = select_keep(&stable, &[], 4).keep;

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn empty_input_selects_nothing() {
        let selection = select_keep(&[], &[], 4);
        assert!(selection.keep.is_empty());
        assert!(selection.merged.is_empty());
    }

    #[test]
    fn selection_is_idempotent() {
        let stable = tags(&["1.0.0", "1.1.0", "2.0.0"]);
        let prerelease = tags(&["2.1.0-rc.1"]);
        let first = select_keep(&stable, &prerelease, 2);
        let second = select_keep(&stable, &prerelease, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn selection_merged_matches_the_classes() {
        let stable = tags(&["1.0.0", "2.0.0"]);
        let prerelease = tags(&["1.5.0-rc.1"]);
        let selection = select_keep(&stable, &prerelease, 2);

        let names: Vec<&str> = selection.merged.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["1.0.0", "1.5.0-rc.1", "2.0.0"]);
    }

    #[test]
    fn merge_preserves_group_order() {
        // Precedence-equal stables keep their (chronological) input order.
        let stable = tags(&["1.0.0+build1", "1.0.0+build2", "2.0.0"]);
        let prerelease = tags(&["1.5.0-rc.1"]);
        let merged = merge_by_precedence(&stable, &prerelease);

        let names: Vec<&str> = merged.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["1.0.0+build1", "1.0.0+build2", "1.5.0-rc.1", "2.0.0"]
        );
    }
}
