//! CLI command implementations
//!
//! Each subcommand has its own module with an Args struct and a `run()`
//! function. The listing commands share [`CriteriaArgs`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::cli::output::{self, Table};
use crate::config::Config;
use crate::criteria::{FilterCriteria, SortKey};
use crate::error::{FacetRankError, Result};
use crate::facets::FacetMap;
use crate::loader;
use crate::pipeline::{PipelineOutput, RankedRecord};
use crate::record::lenient;

pub mod agents;
pub mod config;
pub mod facets;
pub mod grants;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Grants(args) => grants::run(ctx, args),
        Commands::Agents(args) => agents::run(ctx, args),
        Commands::Facets(args) => facets::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// Flags every listing command accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CriteriaArgs {
    /// Snapshot file (.json, .yaml or .yml)
    #[arg(long, short = 'd')]
    pub data: PathBuf,

    /// Criteria file (.json, .yaml or .toml); flags override its fields
    #[arg(long, short = 'c')]
    pub criteria: Option<PathBuf>,

    /// Reference instant for status and scoring (default: now)
    #[arg(long)]
    pub now: Option<String>,

    /// Case-insensitive text search over title, id and description
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Minimum match score (0-100)
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Sort key: dateClosingDesc, dateClosingAsc, titleAsc, titleDesc,
    /// statusPriority, ratingDesc, responseTimeAsc, scoreDesc
    #[arg(long)]
    pub sort: Option<String>,

    /// Show at most this many results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

impl CriteriaArgs {
    /// Config defaults, then the criteria file, then flags.
    pub fn base_criteria(&self, config: &Config) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::new()
            .with_sort(config.pipeline.default_sort.clone())
            .with_min_score(config.pipeline.default_min_score);

        if let Some(path) = &self.criteria {
            criteria.merge(loader::load_criteria(path)?);
        }
        if let Some(text) = &self.search {
            criteria = criteria.with_search(text.clone());
        }
        if let Some(score) = self.min_score {
            criteria = criteria.with_min_score(score);
        }
        if let Some(sort) = &self.sort {
            criteria = criteria.with_sort(SortKey::parse(sort));
        }
        Ok(criteria)
    }

    pub fn now(&self) -> Result<DateTime<Utc>> {
        self.now.as_deref().map_or_else(
            || Ok(Utc::now()),
            |raw| {
                lenient::parse_instant(raw).ok_or_else(|| {
                    FacetRankError::InvalidInput(format!(
                        "--now {raw}: expected RFC 3339 or YYYY-MM-DD"
                    ))
                })
            },
        )
    }
}

/// Robot payload shared by the listing commands.
#[derive(Serialize)]
struct ListingReport<'a, R> {
    now: DateTime<Utc>,
    total: usize,
    matched: usize,
    criteria: &'a FilterCriteria,
    results: &'a [RankedRecord<'a, R>],
    facets: &'a FacetMap,
}

/// Print a pipeline result as a table or a robot envelope.
fn emit_listing<R: Serialize>(
    ctx: &AppContext,
    output: &PipelineOutput<'_, R>,
    meta: ListingMeta<'_>,
    columns: &[&str],
    row: impl Fn(usize, &RankedRecord<'_, R>) -> Vec<String>,
) -> Result<()> {
    let shown = meta.limit.map_or(output.results.len(), |limit| {
        limit.min(output.results.len())
    });
    let results = &output.results[..shown];

    if ctx.robot_mode() {
        let report = ListingReport {
            now: meta.now,
            total: meta.total,
            matched: output.results.len(),
            criteria: meta.criteria,
            results,
            facets: &output.facets,
        };
        return output::emit_json(&output::robot_ok(report));
    }

    if results.is_empty() {
        println!("No {} match the current filters ({} total).", meta.noun, meta.total);
        return Ok(());
    }

    let mut table = Table::new(columns.iter().copied());
    for (i, ranked) in results.iter().enumerate() {
        table.push_row(row(i + 1, ranked));
    }
    println!("{}", table.render(ctx.output_format.use_colors()));
    println!();
    println!(
        "{} of {} {} shown (sorted by {})",
        shown,
        meta.total,
        meta.noun,
        meta.criteria.sort_key
    );
    Ok(())
}

struct ListingMeta<'a> {
    noun: &'static str,
    total: usize,
    now: DateTime<Utc>,
    criteria: &'a FilterCriteria,
    limit: Option<usize>,
}
