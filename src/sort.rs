//! Result ordering.
//!
//! All sorts are stable, so ties keep the collection order. Records missing
//! the sort field go last in either direction.

use std::cmp::{Ordering, Reverse};

use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::criteria::SortKey;
use crate::pipeline::RankedRecord;
use crate::record::{Record, metric};

/// Applies a [`SortKey`] to ranked results.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sorter;

impl Sorter {
    /// Sort in place. An unrecognized key leaves the order untouched.
    pub fn sort<R: Record>(results: &mut [RankedRecord<'_, R>], key: &SortKey) {
        match key {
            SortKey::DateClosingAsc => {
                results.sort_by(|a, b| {
                    missing_last(
                        a.record.window().closes_at,
                        b.record.window().closes_at,
                        Ord::cmp,
                    )
                });
            }
            SortKey::DateClosingDesc => {
                results.sort_by(|a, b| {
                    missing_last(
                        a.record.window().closes_at,
                        b.record.window().closes_at,
                        |x, y| y.cmp(x),
                    )
                });
            }
            SortKey::TitleAsc => {
                results.sort_by_cached_key(|r| TitleKey::new(r.record.title()));
            }
            SortKey::TitleDesc => {
                results.sort_by_cached_key(|r| Reverse(TitleKey::new(r.record.title())));
            }
            SortKey::StatusPriority => results.sort_by_key(|r| r.status.priority()),
            SortKey::RatingDesc => {
                results.sort_by(|a, b| {
                    missing_last(
                        a.record.metric(metric::RATING),
                        b.record.metric(metric::RATING),
                        |x, y| y.total_cmp(x),
                    )
                });
            }
            SortKey::ResponseTimeAsc => {
                results.sort_by(|a, b| {
                    missing_last(
                        a.record.metric(metric::RESPONSE_HOURS),
                        b.record.metric(metric::RESPONSE_HOURS),
                        f64::total_cmp,
                    )
                });
            }
            SortKey::ScoreDesc => results.sort_by_key(|r| Reverse(r.score)),
            SortKey::Unrecognized(raw) => {
                debug!(key = %raw, "unrecognized sort key, keeping collection order");
            }
        }
    }
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Collation key approximating a locale-aware, accent- and case-insensitive
/// comparison, with the raw title as tie-breaker so the order is total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct TitleKey {
    folded: String,
    raw: String,
}

impl TitleKey {
    fn new(title: &str) -> Self {
        Self {
            folded: fold(title),
            raw: title.to_string(),
        }
    }
}

/// Decompose, drop combining marks, lowercase.
fn fold(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
