//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// facetrank - filter, search and rank listing snapshots
#[derive(Parser, Debug)]
#[command(name = "facetrank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit a JSON envelope on stdout and JSON logs on stderr
    #[arg(long, global = true)]
    pub robot: bool,

    /// Disable colors in table output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/facetrank/config.toml, then ./facetrank.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and rank a grants snapshot
    Grants(commands::grants::GrantsArgs),

    /// Filter and rank an agents snapshot
    Agents(commands::agents::AgentsArgs),

    /// List facet values available in a snapshot
    Facets(commands::facets::FacetsArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}
