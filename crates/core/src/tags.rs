//! In-memory model of the `tag_track_user` materialized view.
//!
//! Mirrors what PostgreSQL computes from `tracks`, so the view's contents can be
//! predicted (and tested) without a database.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TAG_SEPARATOR;

/// The subset of a `tracks` row that feeds the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRow {
    pub track_id: i32,
    pub owner_id: i32,
    pub tags: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub is_current: Option<bool>,
    pub is_unlisted: Option<bool>,
    pub stem_of: Option<serde_json::Value>,
}

impl TrackRow {
    /// A current, listed, non-stem track owned by `owner_id`.
    #[must_use]
    pub fn new(track_id: i32, owner_id: i32, tags: Option<&str>) -> Self {
        Self {
            track_id,
            owner_id,
            tags: tags.map(str::to_owned),
            updated_at: Utc::now(),
            is_current: Some(true),
            is_unlisted: Some(false),
            stem_of: None,
        }
    }

    /// Whether the row passes the view's `WHERE` clause.
    ///
    /// `is_current IS TRUE` and `is_unlisted IS FALSE` both reject NULL.
    #[must_use]
    pub fn is_indexable(&self) -> bool {
        let has_tags = self.tags.as_deref().is_some_and(|t| !t.is_empty());
        has_tags
            && self.is_current == Some(true)
            && self.is_unlisted == Some(false)
            && self.stem_of.is_none()
    }
}

/// One row of `tag_track_user`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagTrackUser {
    pub tag: String,
    pub track_id: i32,
    pub owner_id: i32,
}

/// Splits a raw `tracks.tags` value the way `string_to_array(LOWER(tags), ',')` does.
///
/// Segments are not trimmed, and empty segments survive as empty strings:
/// `"Rock, Pop"` yields `["rock", " pop"]`, `"a,,b"` yields `["a", "", "b"]`.
///
/// Case folding uses `str::to_lowercase`, which matches PostgreSQL `LOWER` for
/// ASCII but can differ for non-ASCII input (final sigma, dotted `İ`) depending
/// on the database collation.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.to_lowercase().split(TAG_SEPARATOR).map(str::to_owned).collect()
}

/// Computes the deduplicated set of rows the view holds for `rows`.
///
/// Ordering by `updated_at` in the view definition does not survive the
/// grouping, so the result is simply sorted by (tag, track, owner).
pub fn derive_tag_track_users<'a, I>(rows: I) -> BTreeSet<TagTrackUser>
where
    I: IntoIterator<Item = &'a TrackRow>,
{
    rows.into_iter()
        .filter(|row| row.is_indexable())
        .flat_map(|row| {
            let raw = row.tags.as_deref().unwrap_or_default();
            split_tags(raw).into_iter().map(move |tag| TagTrackUser {
                tag,
                track_id: row.track_id,
                owner_id: row.owner_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttu(tag: &str, track_id: i32, owner_id: i32) -> TagTrackUser {
        TagTrackUser { tag: tag.to_owned(), track_id, owner_id }
    }

    #[test]
    fn split_lowercases_without_trimming() {
        assert_eq!(split_tags("Rock,Pop"), vec!["rock", "pop"]);
        assert_eq!(split_tags("Rock, Pop"), vec!["rock", " pop"]);
        assert_eq!(split_tags("a,,b,"), vec!["a", "", "b", ""]);
        assert_eq!(split_tags("solo"), vec!["solo"]);
    }

    #[test]
    fn duplicate_tags_collapse() {
        let rows = [TrackRow::new(5, 1, Some("Rock,Pop,Rock"))];
        let derived = derive_tag_track_users(&rows);
        let expected: BTreeSet<_> = [ttu("pop", 5, 1), ttu("rock", 5, 1)].into_iter().collect();
        assert_eq!(derived, expected);
    }

    #[test]
    fn spaced_tags_are_distinct_values() {
        let rows = [TrackRow::new(5, 1, Some("Rock, Pop, Rock"))];
        let derived = derive_tag_track_users(&rows);
        let expected: BTreeSet<_> =
            [ttu("rock", 5, 1), ttu(" pop", 5, 1), ttu(" rock", 5, 1)].into_iter().collect();
        assert_eq!(derived, expected);
    }

    #[test]
    fn case_variants_merge() {
        let rows = [TrackRow::new(7, 2, Some("LoFi,lofi,LOFI"))];
        assert_eq!(derive_tag_track_users(&rows).len(), 1);
    }

    #[test]
    fn empty_and_null_tags_contribute_nothing() {
        let rows = [TrackRow::new(1, 1, Some("")), TrackRow::new(2, 1, None)];
        assert!(derive_tag_track_users(&rows).is_empty());
    }

    #[test]
    fn hidden_tracks_contribute_nothing() {
        let mut unlisted = TrackRow::new(1, 1, Some("rock"));
        unlisted.is_unlisted = Some(true);
        let mut stale = TrackRow::new(2, 1, Some("rock"));
        stale.is_current = Some(false);
        let mut stem = TrackRow::new(3, 1, Some("rock"));
        stem.stem_of = Some(serde_json::json!({"parent_track_id": 9, "category": "bass"}));
        let mut null_flags = TrackRow::new(4, 1, Some("rock"));
        null_flags.is_current = None;
        null_flags.is_unlisted = None;

        assert!(derive_tag_track_users(&[unlisted, stale, stem, null_flags]).is_empty());
    }

    #[test]
    fn same_tag_on_different_tracks_and_owners() {
        let rows = [
            TrackRow::new(1, 10, Some("ambient")),
            TrackRow::new(2, 10, Some("Ambient")),
            TrackRow::new(3, 11, Some("ambient,drone")),
        ];
        let derived = derive_tag_track_users(&rows);
        assert_eq!(derived.len(), 4);
        assert!(derived.contains(&ttu("drone", 3, 11)));
        assert_eq!(derived.iter().filter(|r| r.tag == "ambient").count(), 3);
    }
}
