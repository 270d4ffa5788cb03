//! Reads snapshot collections and criteria files from disk.
//!
//! The format comes from the file extension. Collections are JSON or YAML
//! arrays; criteria files may also be TOML.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::criteria::CriteriaPatch;
use crate::error::{FacetRankError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(FacetRankError::UnsupportedFormat(format!(
                "{} (expected .json, .yaml, .yml or .toml)",
                path.display()
            ))),
        }
    }
}

/// Load a record collection from a JSON or YAML file.
pub fn load_collection<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>> {
    let format = Format::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    let records = parse_collection(&raw, format)?;
    debug!(path = %path.display(), records = records.len(), "loaded collection");
    Ok(records)
}

pub fn parse_collection<R: DeserializeOwned>(raw: &str, format: Format) -> Result<Vec<R>> {
    match format {
        Format::Json => Ok(serde_json::from_str(raw)?),
        Format::Yaml => Ok(serde_yaml::from_str(raw)?),
        Format::Toml => Err(FacetRankError::UnsupportedFormat(
            "collections must be JSON or YAML".to_string(),
        )),
    }
}

/// Load a partial criteria file.
pub fn load_criteria(path: &Path) -> Result<CriteriaPatch> {
    let format = Format::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    parse_criteria(&raw, format)
        .map_err(|err| FacetRankError::InvalidInput(format!("{}: {err}", path.display())))
}

pub fn parse_criteria(raw: &str, format: Format) -> Result<CriteriaPatch> {
    match format {
        Format::Json => Ok(serde_json::from_str(raw)?),
        Format::Yaml => Ok(serde_yaml::from_str(raw)?),
        Format::Toml => {
            toml::from_str(raw).map_err(|err| FacetRankError::InvalidInput(err.to_string()))
        }
    }
}
