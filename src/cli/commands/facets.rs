//! facetrank facets - list selector values for a snapshot

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use colored::Colorize;
use itertools::Itertools;

use crate::app::AppContext;
use crate::cli::output;
use crate::error::Result;
use crate::facets::{FacetIndexer, FacetMap, FacetValues};
use crate::loader;
use crate::record::{Opportunity, Provider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecordKind {
    #[default]
    Grants,
    Agents,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FacetsArgs {
    /// Snapshot file (.json, .yaml or .yml)
    #[arg(long, short = 'd')]
    pub data: PathBuf,

    /// Record kind stored in the snapshot
    #[arg(long, value_enum, default_value_t = RecordKind::Grants)]
    pub kind: RecordKind,
}

pub fn run(ctx: &AppContext, args: &FacetsArgs) -> Result<()> {
    let facets = match args.kind {
        RecordKind::Grants => {
            FacetIndexer::index(&loader::load_collection::<Opportunity>(&args.data)?)
        }
        RecordKind::Agents => {
            FacetIndexer::index(&loader::load_collection::<Provider>(&args.data)?)
        }
    };

    if ctx.robot_mode() {
        return output::emit_json(&output::robot_ok(&facets));
    }
    println!("{}", render(&facets, ctx.output_format.use_colors()));
    Ok(())
}

fn render(facets: &FacetMap, colors: bool) -> String {
    let heading = |name: &str| {
        if colors {
            name.bold().to_string()
        } else {
            name.to_string()
        }
    };

    let mut sections = Vec::new();
    if !facets.kinds.values.is_empty() {
        sections.push(format!("{}\n  {}", heading("kind"), render_values(&facets.kinds)));
    }
    for (name, values) in &facets.facets {
        let body = if values.values.is_empty() {
            "(none)".to_string()
        } else {
            render_values(values)
        };
        sections.push(format!("{}\n  {body}", heading(name.as_str())));
    }
    sections.join("\n\n")
}

fn render_values(values: &FacetValues) -> String {
    values
        .values
        .iter()
        .map(|value| format!("{value} ({})", values.count(value)))
        .join(", ")
}
