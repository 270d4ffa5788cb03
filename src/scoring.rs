//! Match-likelihood scoring.
//!
//! A fixed additive heuristic, not a statistical model: start from a base,
//! add bonuses for signals that make a listing easier to qualify for, and
//! clamp. The score depends on one record and `now` only, so it can be
//! computed before or after filtering with identical results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::status::{self, Status};

/// Hard bounds every score lands in, whatever the configured floor and ceiling.
pub const SCORE_FLOOR: i32 = 45;
pub const SCORE_CEILING: i32 = 95;

/// Largest magnitude accepted for any configured weight.
pub const MAX_WEIGHT: i32 = 100;

/// Keywords in a record's uses that earn the favorable-use bonus.
pub const DEFAULT_FAVORABLE_KEYWORDS: [&str; 4] = ["Energy", "Solar", "Repair", "Mitigation"];

/// The scoring table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Starting score (default: 65).
    pub base: i32,
    /// Added when the listing is open now (default: 15).
    pub open_bonus: i32,
    /// Added for nationwide/broad-scope listings (default: 10).
    pub broad_scope_bonus: i32,
    /// Added when the requirement list is short (default: 5).
    pub few_requirements_bonus: i32,
    /// "Short" means at most this many requirements (default: 2).
    pub few_requirements_limit: usize,
    /// Added when any use matches a favorable keyword (default: 5).
    pub favorable_use_bonus: i32,
    /// Lower clamp (default: 45).
    pub floor: i32,
    /// Upper clamp (default: 95).
    pub ceiling: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 65,
            open_bonus: 15,
            broad_scope_bonus: 10,
            few_requirements_bonus: 5,
            few_requirements_limit: 2,
            favorable_use_bonus: 5,
            floor: 45,
            ceiling: 95,
        }
    }
}

impl ScoringWeights {
    /// Clamp `raw` into `[floor, ceiling]`, then into `[45, 95]`.
    ///
    /// Never panics, even for an inverted floor/ceiling pair.
    pub fn clamp(&self, raw: i32) -> u8 {
        let bounded = raw
            .max(self.floor)
            .min(self.ceiling)
            .clamp(SCORE_FLOOR, SCORE_CEILING);
        u8::try_from(bounded).unwrap_or(0)
    }
}

/// Bounded match score, displayed as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScore(u8);

impl MatchScore {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// True when the score reaches `threshold`. A threshold of 0 or less
    /// always passes.
    pub fn meets(self, threshold: f64) -> bool {
        threshold <= 0.0 || f64::from(self.0) >= threshold
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Which bonuses fired for a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: i32,
    pub open: i32,
    pub broad_scope: i32,
    pub few_requirements: i32,
    pub favorable_use: i32,
    /// Sum before clamping.
    pub raw: i32,
}

impl ScoreBreakdown {
    fn total(&self) -> i32 {
        [self.open, self.broad_scope, self.few_requirements, self.favorable_use]
            .into_iter()
            .fold(self.base, i32::saturating_add)
    }
}

/// Computes [`MatchScore`]s from the weights table.
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
    favorable_keywords: Vec<String>,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(
            ScoringWeights::default(),
            DEFAULT_FAVORABLE_KEYWORDS.map(String::from).to_vec(),
        )
    }
}

impl ScoreCalculator {
    pub const fn new(weights: ScoringWeights, favorable_keywords: Vec<String>) -> Self {
        Self {
            weights,
            favorable_keywords,
        }
    }

    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn favorable_keywords(&self) -> &[String] {
        &self.favorable_keywords
    }

    /// Score a record whose status is not known yet.
    pub fn score<R: Record>(&self, record: &R, now: DateTime<Utc>) -> MatchScore {
        self.score_with_status(record, status::resolve(record, now))
    }

    /// Score a record with an already-resolved status.
    pub fn score_with_status<R: Record>(&self, record: &R, status: Status) -> MatchScore {
        let breakdown = self.breakdown_with_status(record, status);
        MatchScore(self.weights.clamp(breakdown.raw))
    }

    pub fn breakdown<R: Record>(&self, record: &R, now: DateTime<Utc>) -> ScoreBreakdown {
        self.breakdown_with_status(record, status::resolve(record, now))
    }

    fn breakdown_with_status<R: Record>(&self, record: &R, status: Status) -> ScoreBreakdown {
        let w = &self.weights;
        let mut breakdown = ScoreBreakdown {
            base: w.base,
            open: if status == Status::Open { w.open_bonus } else { 0 },
            broad_scope: if record.is_broad_scope() {
                w.broad_scope_bonus
            } else {
                0
            },
            few_requirements: if record.requirements().len() <= w.few_requirements_limit {
                w.few_requirements_bonus
            } else {
                0
            },
            favorable_use: if self.has_favorable_use(record.uses()) {
                w.favorable_use_bonus
            } else {
                0
            },
            raw: 0,
        };
        breakdown.raw = breakdown.total();
        breakdown
    }

    /// Case-sensitive substring match of any use against any keyword.
    fn has_favorable_use(&self, uses: &[String]) -> bool {
        uses.iter().any(|entry| {
            self.favorable_keywords
                .iter()
                .any(|keyword| !keyword.is_empty() && entry.contains(keyword.as_str()))
        })
    }
}
