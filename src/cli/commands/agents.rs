//! facetrank agents - filter and rank an agents snapshot

use clap::Args;

use super::{CriteriaArgs, ListingMeta, emit_listing};
use crate::app::AppContext;
use crate::criteria::FilterCriteria;
use crate::error::Result;
use crate::loader;
use crate::pipeline::apply_with;
use crate::record::{Provider, facet};

#[derive(Args, Debug, Clone, Default)]
pub struct AgentsArgs {
    #[command(flatten)]
    pub common: CriteriaArgs,

    /// Keep agents with any of these specialties (repeatable)
    #[arg(long)]
    pub specialty: Vec<String>,

    /// Keep agents with any of these certifications (repeatable)
    #[arg(long)]
    pub certification: Vec<String>,

    /// Minimum rating (0-5)
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Maximum typical response time in hours
    #[arg(long)]
    pub max_response_hours: Option<u32>,

    /// Only agents currently online
    #[arg(long)]
    pub online_only: bool,
}

impl AgentsArgs {
    pub fn criteria(&self, ctx: &AppContext) -> Result<FilterCriteria> {
        let mut criteria = self.common.base_criteria(&ctx.config)?;
        if !self.specialty.is_empty() {
            criteria = criteria.select(facet::SPECIALTIES, self.specialty.iter().cloned());
        }
        if !self.certification.is_empty() {
            criteria = criteria.select(facet::CERTIFICATIONS, self.certification.iter().cloned());
        }
        if let Some(rating) = self.min_rating {
            criteria = criteria.with_min_rating(rating);
        }
        if let Some(hours) = self.max_response_hours {
            criteria = criteria.with_max_response_hours(hours);
        }
        if self.online_only {
            criteria = criteria.online_only(true);
        }
        Ok(criteria)
    }
}

pub fn run(ctx: &AppContext, args: &AgentsArgs) -> Result<()> {
    let agents: Vec<Provider> = loader::load_collection(&args.common.data)?;
    let criteria = args.criteria(ctx)?;
    let now = args.common.now()?;
    let output = apply_with(&agents, &criteria, now, &ctx.settings);

    let meta = ListingMeta {
        noun: "agents",
        total: agents.len(),
        now,
        criteria: &criteria,
        limit: args.common.limit,
    };
    emit_listing(
        ctx,
        &output,
        meta,
        &["#", "SCORE", "RATING", "RESPONSE", "ONLINE", "NAME"],
        |rank, ranked| {
            let agent = ranked.record;
            vec![
                rank.to_string(),
                ranked.score.to_string(),
                agent
                    .rating
                    .map_or_else(|| "-".to_string(), |r| format!("{r:.1}")),
                agent
                    .response_hours
                    .map_or_else(|| "-".to_string(), |h| format!("{h}h")),
                if agent.is_online { "yes" } else { "no" }.to_string(),
                agent.name.clone(),
            ]
        },
    )
}
