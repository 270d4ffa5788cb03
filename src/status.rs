//! Lifecycle status derived from a record's application window.
//!
//! `now` is always passed in; nothing here reads the wall clock.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::record::{DateWindow, Record};

/// Where a record sits relative to its application window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Upcoming,
    Closed,
    /// Missing dates or an inverted window.
    Indeterminate,
}

impl Status {
    /// Parse case-insensitively. Only the three concrete statuses are
    /// selectable; anything else (including "indeterminate") is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "upcoming" => Some(Self::Upcoming),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Upcoming => "upcoming",
            Self::Closed => "closed",
            Self::Indeterminate => "indeterminate",
        }
    }

    /// Position under the status-priority sort.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Upcoming => 1,
            Self::Closed => 2,
            Self::Indeterminate => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve the status of a window at `now`. Both bounds are inclusive.
pub fn resolve_window(window: &DateWindow, now: DateTime<Utc>) -> Status {
    let (Some(opens_at), Some(closes_at)) = (window.opens_at, window.closes_at) else {
        return Status::Indeterminate;
    };
    if opens_at > closes_at {
        warn!(%opens_at, %closes_at, "inverted date window, status is indeterminate");
        return Status::Indeterminate;
    }
    if now < opens_at {
        Status::Upcoming
    } else if now > closes_at {
        Status::Closed
    } else {
        Status::Open
    }
}

/// Resolve the status of any record at `now`.
pub fn resolve<R: Record>(record: &R, now: DateTime<Utc>) -> Status {
    resolve_window(&record.window(), now)
}

/// "Time remaining" hint shown next to open listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum TimeRemaining {
    Today,
    Tomorrow,
    /// 2..=7 calendar days.
    Days(u32),
    /// 8..=30 calendar days, in whole weeks.
    Weeks(u32),
}

impl TimeRemaining {
    const DAYS_CUTOFF: i64 = 7;
    const WEEKS_CUTOFF: i64 = 30;

    /// Bucket the calendar-day distance from `now` to `closes_at`.
    ///
    /// `None` when the deadline is missing, already passed, or more than 30
    /// days out.
    pub fn until(closes_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Self> {
        let closes_at = closes_at?;
        if closes_at < now {
            return None;
        }
        let days = (closes_at.date_naive() - now.date_naive()).num_days();
        match days {
            0 => Some(Self::Today),
            1 => Some(Self::Tomorrow),
            2..=Self::DAYS_CUTOFF => u32::try_from(days).ok().map(Self::Days),
            8..=Self::WEEKS_CUTOFF => u32::try_from(days / 7).ok().map(Self::Weeks),
            _ => None,
        }
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "Closes today"),
            Self::Tomorrow => write!(f, "Closes tomorrow"),
            Self::Days(n) => write!(f, "{n} days left"),
            Self::Weeks(1) => write!(f, "1 week left"),
            Self::Weeks(n) => write!(f, "{n} weeks left"),
        }
    }
}

impl From<TimeRemaining> for String {
    fn from(value: TimeRemaining) -> Self {
        value.to_string()
    }
}
