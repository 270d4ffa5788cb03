//! The full filter pipeline.
//!
//! collection -> facets (side output) -> predicate -> score -> min-score
//! cutoff -> sort. Every run recomputes results from scratch; the only thing
//! [`FilterPipeline`] caches is the facet index, which depends on the
//! collection alone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::Config;
use crate::criteria::FilterCriteria;
use crate::facets::{FacetIndexer, FacetMap};
use crate::predicate::{PredicateCompiler, PredicateOptions};
use crate::record::Record;
use crate::scoring::{MatchScore, ScoreCalculator};
use crate::sort::Sorter;
use crate::status::{self, Status, TimeRemaining};

/// A record that survived filtering, annotated with its score and status.
///
/// The record itself is borrowed untouched from the collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecord<'a, R> {
    #[serde(flatten)]
    pub record: &'a R,
    pub score: MatchScore,
    pub status: Status,
    /// Only set for open records closing within 30 days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<TimeRemaining>,
}

impl<'a, R> RankedRecord<'a, R> {
    pub const fn new(
        record: &'a R,
        score: MatchScore,
        status: Status,
        time_remaining: Option<TimeRemaining>,
    ) -> Self {
        Self {
            record,
            score,
            status,
            time_remaining,
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput<'a, R> {
    pub results: Vec<RankedRecord<'a, R>>,
    /// Built from the whole collection, not from `results`.
    pub facets: FacetMap,
}

impl<R> PipelineOutput<'_, R> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Scorer and predicate options used by a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub scorer: ScoreCalculator,
    pub predicate: PredicateOptions,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scorer: ScoreCalculator::new(
                config.scoring.weights.clone(),
                config.scoring.favorable_keywords.clone(),
            ),
            predicate: PredicateOptions {
                search_description: config.pipeline.search_description,
            },
        }
    }
}

/// Run the pipeline once with default settings.
pub fn apply<'a, R: Record>(
    records: &'a [R],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> PipelineOutput<'a, R> {
    apply_with(records, criteria, now, &PipelineSettings::default())
}

/// Run the pipeline once with explicit settings.
pub fn apply_with<'a, R: Record>(
    records: &'a [R],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
    settings: &PipelineSettings,
) -> PipelineOutput<'a, R> {
    PipelineOutput {
        results: rank(records, criteria, now, settings),
        facets: FacetIndexer::index(records),
    }
}

fn rank<'a, R: Record>(
    records: &'a [R],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
    settings: &PipelineSettings,
) -> Vec<RankedRecord<'a, R>> {
    let predicate = PredicateCompiler::new(settings.predicate).compile(criteria, now);

    let mut results: Vec<RankedRecord<'a, R>> = records
        .iter()
        .filter_map(|record| {
            let status = status::resolve(record, now);
            if !predicate.matches_with_status(record, status) {
                return None;
            }
            let score = settings.scorer.score_with_status(record, status);
            if !score.meets(criteria.min_score) {
                trace!(id = record.id(), %score, min_score = criteria.min_score, "below min score");
                return None;
            }
            let time_remaining = if status == Status::Open {
                TimeRemaining::until(record.window().closes_at, now)
            } else {
                None
            };
            Some(RankedRecord::new(record, score, status, time_remaining))
        })
        .collect();

    Sorter::sort(&mut results, &criteria.sort_key);

    debug!(
        total = records.len(),
        kept = results.len(),
        active_filters = predicate.active_filters(),
        sort = %criteria.sort_key,
        "pipeline run"
    );
    results
}

/// Owns a snapshot collection and its facet index.
///
/// Facets are rebuilt only by [`replace_collection`](Self::replace_collection);
/// [`run`](Self::run) matches [`apply_with`] output exactly.
#[derive(Debug, Clone)]
pub struct FilterPipeline<R> {
    records: Vec<R>,
    facets: FacetMap,
    settings: PipelineSettings,
}

impl<R: Record> FilterPipeline<R> {
    pub fn new(records: Vec<R>) -> Self {
        let facets = FacetIndexer::index(&records);
        Self {
            records,
            facets,
            settings: PipelineSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn run(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> PipelineOutput<'_, R> {
        PipelineOutput {
            results: rank(&self.records, criteria, now, &self.settings),
            facets: self.facets.clone(),
        }
    }

    /// Swap in a new snapshot and re-index its facets.
    pub fn replace_collection(&mut self, records: Vec<R>) {
        self.facets = FacetIndexer::index(&records);
        self.records = records;
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub const fn facets(&self) -> &FacetMap {
        &self.facets
    }

    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SortKey;
    use crate::record::{Opportunity, Provider, facet};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, m, day, 0, 0, 0).unwrap())
    }

    fn ids<R: Record>(output: &PipelineOutput<'_, R>) -> Vec<String> {
        output
            .results
            .iter()
            .map(|r| r.record.id().to_string())
            .collect()
    }

    fn grants() -> Vec<Opportunity> {
        vec![
            Opportunity::new("solar", "Solar Rebate")
                .with_window(d(2025, 1, 1), d(2025, 6, 10))
                .with_kind("rebate")
                .with_uses(["Solar"]),
            Opportunity::new("national", "National Roof Grant")
                .with_window(d(2025, 1, 1), d(2025, 12, 31))
                .nationwide(true)
                .with_kind("grant")
                .with_uses(["Roof Repair"]),
            Opportunity::new("old", "Closed Loan")
                .with_window(d(2024, 1, 1), d(2024, 12, 31))
                .with_kind("loan")
                .with_requirements(["a", "b", "c"]),
            Opportunity::new("undated", "Someday Grant").with_kind("grant"),
        ]
    }

    #[test]
    fn default_criteria_keeps_everything_sorted_by_closing_desc() {
        let records = grants();
        let output = apply(&records, &FilterCriteria::default(), now());
        assert_eq!(ids(&output), ["national", "solar", "old", "undated"]);
    }

    #[test]
    fn facets_ignore_filters() {
        let records = grants();
        let criteria = FilterCriteria::new().include_broad_scope(false);
        let output = apply(&records, &criteria, now());
        assert!(!ids(&output).contains(&"national".to_string()));
        assert!(output.facets.values(facet::USES).contains(&"Roof Repair".to_string()));
        assert_eq!(output.facets.kinds(), ["grant", "loan", "rebate"].map(String::from));
    }

    #[test]
    fn min_score_cuts_after_scoring() {
        let records = grants();
        let output = apply(&records, &FilterCriteria::new().with_min_score(85.0), now());
        // solar: 65 + 15 + 5 + 5 = 90; national: 95; old: 65; undated: 70
        assert_eq!(ids(&output), ["national", "solar"]);
        assert!(output.results.iter().all(|r| r.score.value() >= 85));
    }

    #[test]
    fn annotations() {
        let records = grants();
        let output = apply(&records, &FilterCriteria::default(), now());
        let solar = output.results.iter().find(|r| r.record.id == "solar").unwrap();
        assert_eq!(solar.status, Status::Open);
        assert_eq!(solar.time_remaining, Some(TimeRemaining::Weeks(1)));
        let old = output.results.iter().find(|r| r.record.id == "old").unwrap();
        assert_eq!(old.status, Status::Closed);
        assert_eq!(old.time_remaining, None);
    }

    #[test]
    fn cached_pipeline_matches_free_function() {
        let records = grants();
        let pipeline = FilterPipeline::new(records.clone());
        let criteria = FilterCriteria::new()
            .with_status("open")
            .with_sort(SortKey::TitleAsc);
        let cached = pipeline.run(&criteria, now());
        let fresh = apply(&records, &criteria, now());
        assert_eq!(ids(&cached), ids(&fresh));
        assert_eq!(cached.facets, fresh.facets);
    }

    #[test]
    fn replace_collection_reindexes() {
        let mut pipeline = FilterPipeline::new(grants());
        assert!(pipeline.facets().values(facet::USES).contains(&"Solar".to_string()));
        pipeline.replace_collection(vec![Opportunity::new("x", "X").with_uses(["Wind"])]);
        assert_eq!(pipeline.facets().values(facet::USES), ["Wind".to_string()]);
        assert_eq!(pipeline.records().len(), 1);
    }

    #[test]
    fn settings_change_scores() {
        let records = grants();
        let settings = PipelineSettings {
            scorer: ScoreCalculator::new(Default::default(), Vec::new()),
            ..PipelineSettings::default()
        };
        let output = apply_with(&records, &FilterCriteria::default(), now(), &settings);
        let solar = output.results.iter().find(|r| r.record.id == "solar").unwrap();
        assert_eq!(solar.score.value(), 85);
    }

    #[test]
    fn providers_run_through_the_same_pipeline() {
        let agents = vec![
            Provider::new("a1", "Dana")
                .with_rating(4.8)
                .with_specialties(["Flood"])
                .online(true),
            Provider::new("a2", "Sam").with_rating(4.1).with_specialties(["Wildfire"]),
            Provider::new("a3", "Lee").with_specialties(["Flood", "Wind"]),
        ];
        let criteria = FilterCriteria::new()
            .select(facet::SPECIALTIES, ["Flood"])
            .with_sort(SortKey::RatingDesc);
        let output = apply(&agents, &criteria, now());
        assert_eq!(ids(&output), ["a1", "a3"]);
        assert!(output.results.iter().all(|r| r.status == Status::Indeterminate));
        assert_eq!(output.facets.values(facet::SPECIALTIES).len(), 3);
    }

    #[test]
    fn serializes_record_fields_inline() {
        let records = vec![Opportunity::new("g", "Grant").with_window(d(2025, 1, 1), d(2025, 6, 2))];
        let output = apply(&records, &FilterCriteria::default(), now());
        let json = serde_json::to_value(&output.results[0]).unwrap();
        assert_eq!(json["id"], "g");
        assert_eq!(json["status"], "open");
        assert_eq!(json["score"], 85);
        assert_eq!(json["timeRemaining"], "Closes tomorrow");
    }

    #[test]
    fn empty_collection() {
        let output = apply::<Opportunity>(&[], &FilterCriteria::default(), now());
        assert!(output.is_empty());
        assert_eq!(output.facets.values(facet::USES).len(), 0);
    }
}
