//! Filter criteria shared by every listing screen.
//!
//! One explicitly typed structure replaces the per-screen filter objects.
//! Fields a record kind doesn't carry are simply inert for it (an agent has
//! no `kind`, a grant has no rating).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::status::Status;

/// Sentinel meaning "this filter is inactive".
pub const ALL: &str = "all";

/// Status selector. Unrecognized strings fall back to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            return Self::All;
        }
        Status::parse(trimmed).map_or_else(
            || {
                warn!(value = %s, "unrecognized status filter, ignoring");
                Self::All
            },
            Self::Only,
        )
    }

    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Only(_))
    }
}

impl From<String> for StatusFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        match value {
            StatusFilter::All => ALL.to_string(),
            StatusFilter::Only(status) => status.as_str().to_string(),
        }
    }
}

/// Result ordering. Unknown keys are kept verbatim and sort as identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    #[default]
    DateClosingDesc,
    DateClosingAsc,
    TitleAsc,
    TitleDesc,
    StatusPriority,
    RatingDesc,
    ResponseTimeAsc,
    ScoreDesc,
    Unrecognized(String),
}

impl SortKey {
    pub const KNOWN: [Self; 8] = [
        Self::DateClosingDesc,
        Self::DateClosingAsc,
        Self::TitleAsc,
        Self::TitleDesc,
        Self::StatusPriority,
        Self::RatingDesc,
        Self::ResponseTimeAsc,
        Self::ScoreDesc,
    ];

    /// Accepts camelCase, snake_case or kebab-case spellings.
    pub fn parse(s: &str) -> Self {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "dateclosingdesc" => Self::DateClosingDesc,
            "dateclosingasc" => Self::DateClosingAsc,
            "titleasc" => Self::TitleAsc,
            "titledesc" => Self::TitleDesc,
            "statuspriority" => Self::StatusPriority,
            "ratingdesc" => Self::RatingDesc,
            "responsetimeasc" => Self::ResponseTimeAsc,
            "scoredesc" => Self::ScoreDesc,
            _ => Self::Unrecognized(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DateClosingDesc => "dateClosingDesc",
            Self::DateClosingAsc => "dateClosingAsc",
            Self::TitleAsc => "titleAsc",
            Self::TitleDesc => "titleDesc",
            Self::StatusPriority => "statusPriority",
            Self::RatingDesc => "ratingDesc",
            Self::ResponseTimeAsc => "responseTimeAsc",
            Self::ScoreDesc => "scoreDesc",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SortKey> for String {
    fn from(value: SortKey) -> Self {
        value.as_str().to_string()
    }
}

/// Everything the user can set on a listing screen.
///
/// Created with defaults, mutated one field at a time, and re-applied in
/// full after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over title, id and description.
    pub search_text: String,
    pub status: StatusFilter,
    /// Single-valued categorical filter; `"all"` bypasses.
    pub kind: String,
    /// Any-of selections per multi-valued facet; empty sets bypass.
    pub selected_values: BTreeMap<String, BTreeSet<String>>,
    /// Match score cutoff, 0-100. 0 disables.
    pub min_score: f64,
    /// Minimum rating (`>=`). 0 disables.
    pub min_rating: f64,
    /// Maximum response time in hours (`<=`). 0 disables.
    pub max_response_hours: u32,
    /// When false, broad-scope (nationwide) records are dropped.
    pub include_broad_scope: bool,
    /// When true, only records flagged online are kept.
    pub online_only: bool,
    pub sort_key: SortKey,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status: StatusFilter::All,
            kind: ALL.to_string(),
            selected_values: BTreeMap::new(),
            min_score: 0.0,
            min_rating: 0.0,
            max_response_hours: 0,
            include_broad_scope: true,
            online_only: false,
            sort_key: SortKey::default(),
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = StatusFilter::parse(status);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Replace the selection for one facet.
    #[must_use]
    pub fn select<I, S>(mut self, facet: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selected_values.remove(facet);
        } else {
            self.selected_values.insert(facet.to_string(), values);
        }
        self
    }

    /// Flip one value in a facet selection, as a checkbox click would.
    pub fn toggle_value(&mut self, facet: &str, value: &str) {
        let selection = self.selected_values.entry(facet.to_string()).or_default();
        if !selection.remove(value) {
            selection.insert(value.to_string());
        }
        if selection.is_empty() {
            self.selected_values.remove(facet);
        }
    }

    /// Clamped into `[0, 100]`; NaN disables the cutoff.
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = sanitize_threshold(min_score, 100.0);
        self
    }

    /// Clamped into `[0, 5]`; NaN disables the filter.
    #[must_use]
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = sanitize_threshold(min_rating, 5.0);
        self
    }

    #[must_use]
    pub const fn with_max_response_hours(mut self, hours: u32) -> Self {
        self.max_response_hours = hours;
        self
    }

    #[must_use]
    pub const fn include_broad_scope(mut self, include: bool) -> Self {
        self.include_broad_scope = include;
        self
    }

    #[must_use]
    pub const fn online_only(mut self, online_only: bool) -> Self {
        self.online_only = online_only;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn selection(&self, facet: &str) -> Option<&BTreeSet<String>> {
        self.selected_values.get(facet).filter(|s| !s.is_empty())
    }

    /// True when every filter sits at its sentinel, so nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && !self.status.is_active()
            && is_all(&self.kind)
            && self.selected_values.values().all(BTreeSet::is_empty)
            && self.min_score <= 0.0
            && self.min_rating <= 0.0
            && self.max_response_hours == 0
            && self.include_broad_scope
            && !self.online_only
    }

    /// Overlay the fields present in `patch`.
    pub fn merge(&mut self, patch: CriteriaPatch) {
        if let Some(value) = patch.search_text {
            self.search_text = value;
        }
        if let Some(value) = patch.status {
            self.status = value;
        }
        if let Some(value) = patch.kind {
            self.kind = value;
        }
        if let Some(value) = patch.selected_values {
            self.selected_values = value;
        }
        if let Some(value) = patch.min_score {
            self.min_score = sanitize_threshold(value, 100.0);
        }
        if let Some(value) = patch.min_rating {
            self.min_rating = sanitize_threshold(value, 5.0);
        }
        if let Some(value) = patch.max_response_hours {
            self.max_response_hours = value;
        }
        if let Some(value) = patch.include_broad_scope {
            self.include_broad_scope = value;
        }
        if let Some(value) = patch.online_only {
            self.online_only = value;
        }
        if let Some(value) = patch.sort_key {
            self.sort_key = value;
        }
    }
}

/// Partial criteria, as read from a criteria file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaPatch {
    pub search_text: Option<String>,
    pub status: Option<StatusFilter>,
    pub kind: Option<String>,
    pub selected_values: Option<BTreeMap<String, BTreeSet<String>>>,
    pub min_score: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_response_hours: Option<u32>,
    pub include_broad_scope: Option<bool>,
    pub online_only: Option<bool>,
    pub sort_key: Option<SortKey>,
}

/// `"all"` (any case) or blank.
pub fn is_all(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL)
}

fn sanitize_threshold(value: f64, max: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, max) }
}
