use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::PipelineSettings;

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub settings: PipelineSettings,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        Ok(Self::new(config, OutputFormat::from_args(cli.robot, cli.plain)))
    }

    pub fn new(config: Config, output_format: OutputFormat) -> Self {
        let settings = PipelineSettings::from_config(&config);
        if !output_format.use_colors() {
            colored::control::set_override(false);
        }
        Self {
            config,
            settings,
            output_format,
        }
    }

    pub const fn robot_mode(&self) -> bool {
        self.output_format.is_machine_readable()
    }
}
