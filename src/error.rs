use std::io;

use thiserror::Error;

/// Errors raised at the edges of the engine.
///
/// Filtering, scoring and sorting never fail; everything here comes from
/// loading configuration, snapshots or command-line input.
#[derive(Error, Debug)]
pub enum FacetRankError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, FacetRankError>;
