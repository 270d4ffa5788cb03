//! facetrank grants - filter and rank a grants snapshot

use clap::Args;

use super::{CriteriaArgs, ListingMeta, emit_listing};
use crate::app::AppContext;
use crate::criteria::FilterCriteria;
use crate::error::Result;
use crate::loader;
use crate::pipeline::apply_with;
use crate::record::{Opportunity, facet};

#[derive(Args, Debug, Clone, Default)]
pub struct GrantsArgs {
    #[command(flatten)]
    pub common: CriteriaArgs,

    /// Status: open, upcoming, closed or all
    #[arg(long)]
    pub status: Option<String>,

    /// Programme kind (grant, rebate, loan, ...) or all
    #[arg(long)]
    pub kind: Option<String>,

    /// Keep grants with any of these uses (repeatable)
    #[arg(long = "use", value_name = "USE")]
    pub uses: Vec<String>,

    /// Keep grants with any of these eligibility requirements (repeatable)
    #[arg(long)]
    pub eligibility: Vec<String>,

    /// Keep grants with any of these compatibility tags (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Exclude nationwide programmes
    #[arg(long)]
    pub no_broad_scope: bool,
}

impl GrantsArgs {
    pub fn criteria(&self, ctx: &AppContext) -> Result<FilterCriteria> {
        let mut criteria = self.common.base_criteria(&ctx.config)?;
        if let Some(status) = &self.status {
            criteria = criteria.with_status(status);
        }
        if let Some(kind) = &self.kind {
            criteria = criteria.with_kind(kind.clone());
        }
        for (name, values) in [
            (facet::USES, &self.uses),
            (facet::ELIGIBILITY, &self.eligibility),
            (facet::COMPATIBILITY, &self.tag),
        ] {
            if !values.is_empty() {
                criteria = criteria.select(name, values.iter().cloned());
            }
        }
        if self.no_broad_scope {
            criteria = criteria.include_broad_scope(false);
        }
        Ok(criteria)
    }
}

pub fn run(ctx: &AppContext, args: &GrantsArgs) -> Result<()> {
    let grants: Vec<Opportunity> = loader::load_collection(&args.common.data)?;
    let criteria = args.criteria(ctx)?;
    let now = args.common.now()?;
    let output = apply_with(&grants, &criteria, now, &ctx.settings);

    let meta = ListingMeta {
        noun: "grants",
        total: grants.len(),
        now,
        criteria: &criteria,
        limit: args.common.limit,
    };
    emit_listing(
        ctx,
        &output,
        meta,
        &["#", "SCORE", "STATUS", "CLOSES", "KIND", "TITLE", "NOTE"],
        |rank, ranked| {
            let grant = ranked.record;
            vec![
                rank.to_string(),
                ranked.score.to_string(),
                ranked.status.to_string(),
                grant
                    .closes_at
                    .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string()),
                grant.kind.clone().unwrap_or_else(|| "-".to_string()),
                grant.title.clone(),
                ranked
                    .time_remaining
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
            ]
        },
    )
}
