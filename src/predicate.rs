//! Compiles [`FilterCriteria`] into a single record predicate.
//!
//! Every active sub-filter is ANDed. Free-text search is just one more
//! conjunct: a search hit never bypasses the status, facet, threshold or
//! toggle checks.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::criteria::{FilterCriteria, StatusFilter, is_all};
use crate::record::{Record, metric};
use crate::status::{self, Status};

/// Why a record was filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Search,
    Status { expected: Status, actual: Status },
    Kind,
    Facet(String),
    MinRating,
    MaxResponseHours,
    BroadScope,
    Offline,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search text not found"),
            Self::Status { expected, actual } => {
                write!(f, "status {actual} does not match {expected}")
            }
            Self::Kind => write!(f, "kind does not match"),
            Self::Facet(name) => write!(f, "no selected {name} value"),
            Self::MinRating => write!(f, "rating below minimum"),
            Self::MaxResponseHours => write!(f, "response time above maximum"),
            Self::BroadScope => write!(f, "broad-scope listings excluded"),
            Self::Offline => write!(f, "not online"),
        }
    }
}

/// Options that shape compilation but aren't user criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateOptions {
    /// Include the description in free-text search.
    pub search_description: bool,
}

impl Default for PredicateOptions {
    fn default() -> Self {
        Self {
            search_description: true,
        }
    }
}

/// Turns criteria into a [`CompiledPredicate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateCompiler {
    options: PredicateOptions,
}

impl PredicateCompiler {
    pub const fn new(options: PredicateOptions) -> Self {
        Self { options }
    }

    /// Compile `criteria` against the reference instant `now`.
    pub fn compile(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> CompiledPredicate {
        let needle = &criteria.search_text;
        CompiledPredicate {
            // Whitespace-only text is the empty sentinel; anything else matches verbatim.
            needle: (!needle.trim().is_empty()).then(|| needle.to_lowercase()),
            status: match criteria.status {
                StatusFilter::All => None,
                StatusFilter::Only(status) => Some(status),
            },
            kind: (!is_all(&criteria.kind)).then(|| criteria.kind.clone()),
            selections: criteria
                .selected_values
                .iter()
                .filter(|(_, values)| !values.is_empty())
                .map(|(facet, values)| (facet.clone(), values.clone()))
                .collect(),
            min_rating: (criteria.min_rating > 0.0).then_some(criteria.min_rating),
            max_response_hours: (criteria.max_response_hours > 0)
                .then_some(f64::from(criteria.max_response_hours)),
            include_broad_scope: criteria.include_broad_scope,
            online_only: criteria.online_only,
            search_description: self.options.search_description,
            now,
        }
    }
}

/// A ready-to-evaluate conjunction of the active sub-filters.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    needle: Option<String>,
    status: Option<Status>,
    kind: Option<String>,
    selections: Vec<(String, BTreeSet<String>)>,
    min_rating: Option<f64>,
    max_response_hours: Option<f64>,
    include_broad_scope: bool,
    online_only: bool,
    search_description: bool,
    now: DateTime<Utc>,
}

impl CompiledPredicate {
    /// Number of active sub-filters.
    pub fn active_filters(&self) -> usize {
        usize::from(self.needle.is_some())
            + usize::from(self.status.is_some())
            + usize::from(self.kind.is_some())
            + self.selections.len()
            + usize::from(self.min_rating.is_some())
            + usize::from(self.max_response_hours.is_some())
            + usize::from(!self.include_broad_scope)
            + usize::from(self.online_only)
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_with_status(record, status::resolve(record, self.now))
    }

    /// Like [`matches`](Self::matches) when the status is already known.
    pub fn matches_with_status<R: Record>(&self, record: &R, status: Status) -> bool {
        match self.rejection(record, status) {
            None => true,
            Some(reason) => {
                trace!(id = record.id(), %reason, "record filtered out");
                false
            }
        }
    }

    /// First failing sub-filter, or `None` when the record passes all.
    pub fn rejection<R: Record>(&self, record: &R, status: Status) -> Option<Rejection> {
        if self
            .needle
            .as_deref()
            .is_some_and(|needle| !self.search_hit(record, needle))
        {
            return Some(Rejection::Search);
        }

        if let Some(expected) = self.status {
            if status != expected {
                return Some(Rejection::Status {
                    expected,
                    actual: status,
                });
            }
        }

        if let Some(kind) = &self.kind {
            if record.kind() != Some(kind.as_str()) {
                return Some(Rejection::Kind);
            }
        }

        for (facet, selected) in &self.selections {
            if !record.facet(facet).iter().any(|v| selected.contains(v)) {
                return Some(Rejection::Facet(facet.clone()));
            }
        }

        if let Some(min) = self.min_rating {
            if !record.metric(metric::RATING).is_some_and(|r| r >= min) {
                return Some(Rejection::MinRating);
            }
        }

        if let Some(max) = self.max_response_hours {
            if !record.metric(metric::RESPONSE_HOURS).is_some_and(|h| h <= max) {
                return Some(Rejection::MaxResponseHours);
            }
        }

        if !self.include_broad_scope && record.is_broad_scope() {
            return Some(Rejection::BroadScope);
        }

        if self.online_only && record.is_online() != Some(true) {
            return Some(Rejection::Offline);
        }

        None
    }

    fn search_hit<R: Record>(&self, record: &R, needle: &str) -> bool {
        contains_folded(record.title(), needle)
            || contains_folded(record.id(), needle)
            || (self.search_description && contains_folded(record.description(), needle))
    }
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle_lower)
}
