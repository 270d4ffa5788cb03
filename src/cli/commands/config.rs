//! facetrank config - show the effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::Config;
use crate::error::{FacetRankError, Result};

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the loaded configuration
    #[arg(long)]
    pub defaults: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    let defaults = Config::default();
    let config = if args.defaults { &defaults } else { &ctx.config };

    if ctx.robot_mode() {
        return output::emit_json(&output::robot_ok(config));
    }

    println!("{}", render(config)?);
    Ok(())
}

fn render(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|err| FacetRankError::Config(format!("render config: {err}")))
}
