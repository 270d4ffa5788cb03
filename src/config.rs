use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::criteria::SortKey;
use crate::error::{FacetRankError, Result};
use crate::scoring::{
    DEFAULT_FAVORABLE_KEYWORDS, MAX_WEIGHT, SCORE_CEILING, SCORE_FLOOR, ScoringWeights,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path (or `FACETRANK_CONFIG`) replaces the file search;
    /// otherwise the global file and then `./facetrank.toml` are merged over
    /// the defaults. Environment overrides apply last.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("FACETRANK_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                FacetRankError::MissingConfig(format!("{} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(local) = Self::load_patch(Path::new("facetrank.toml"))? {
                config.merge_patch(local);
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document over the defaults, without touching the
    /// filesystem or the environment.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch = toml::from_str(raw)
            .map_err(|err| FacetRankError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("facetrank/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            FacetRankError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            FacetRankError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.scoring {
            self.scoring.merge(patch);
        }
        if let Some(patch) = patch.pipeline {
            self.pipeline.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(values) = env_list(lookup("FACETRANK_FAVORABLE_KEYWORDS")) {
            self.scoring.favorable_keywords = values;
        }
        if let Some(value) = lookup("FACETRANK_DEFAULT_SORT") {
            self.pipeline.default_sort = SortKey::parse(&value);
        }
        let key = "FACETRANK_DEFAULT_MIN_SCORE";
        if let Some(value) = env_f64(key, lookup(key))? {
            self.pipeline.default_min_score = value;
        }
        if let Some(value) = env_bool(lookup("FACETRANK_SEARCH_DESCRIPTION")) {
            self.pipeline.search_description = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let weights = &self.scoring.weights;
        for (name, value) in [
            ("base", weights.base),
            ("open_bonus", weights.open_bonus),
            ("broad_scope_bonus", weights.broad_scope_bonus),
            ("few_requirements_bonus", weights.few_requirements_bonus),
            ("favorable_use_bonus", weights.favorable_use_bonus),
        ] {
            if !(-MAX_WEIGHT..=MAX_WEIGHT).contains(&value) {
                return Err(FacetRankError::Config(format!(
                    "scoring.{name} must be within -{MAX_WEIGHT}..={MAX_WEIGHT}, got {value}"
                )));
            }
        }
        if weights.floor < SCORE_FLOOR || weights.ceiling > SCORE_CEILING {
            return Err(FacetRankError::Config(format!(
                "scoring.floor/ceiling must stay within {SCORE_FLOOR}-{SCORE_CEILING}, got {}-{}",
                weights.floor, weights.ceiling
            )));
        }
        if weights.floor > weights.ceiling {
            return Err(FacetRankError::Config(format!(
                "scoring.floor ({}) is above scoring.ceiling ({})",
                weights.floor, weights.ceiling
            )));
        }
        if !(0.0..=100.0).contains(&self.pipeline.default_min_score) {
            return Err(FacetRankError::Config(format!(
                "pipeline.default_min_score must be within 0-100, got {}",
                self.pipeline.default_min_score
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(flatten)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub favorable_keywords: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            favorable_keywords: DEFAULT_FAVORABLE_KEYWORDS.map(String::from).to_vec(),
        }
    }
}

impl ScoringConfig {
    fn merge(&mut self, patch: ScoringPatch) {
        let weights = &mut self.weights;
        if let Some(value) = patch.base {
            weights.base = value;
        }
        if let Some(value) = patch.open_bonus {
            weights.open_bonus = value;
        }
        if let Some(value) = patch.broad_scope_bonus {
            weights.broad_scope_bonus = value;
        }
        if let Some(value) = patch.few_requirements_bonus {
            weights.few_requirements_bonus = value;
        }
        if let Some(value) = patch.few_requirements_limit {
            weights.few_requirements_limit = value;
        }
        if let Some(value) = patch.favorable_use_bonus {
            weights.favorable_use_bonus = value;
        }
        if let Some(value) = patch.floor {
            weights.floor = value;
        }
        if let Some(value) = patch.ceiling {
            weights.ceiling = value;
        }
        if let Some(values) = patch.favorable_keywords {
            self.favorable_keywords = values;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sort used when the criteria don't name one.
    #[serde(default)]
    pub default_sort: SortKey,
    #[serde(default)]
    pub default_min_score: f64,
    #[serde(default = "default_true")]
    pub search_description: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_sort: SortKey::default(),
            default_min_score: 0.0,
            search_description: true,
        }
    }
}

impl PipelineConfig {
    fn merge(&mut self, patch: PipelinePatch) {
        if let Some(value) = patch.default_sort {
            self.default_sort = value;
        }
        if let Some(value) = patch.default_min_score {
            self.default_min_score = value;
        }
        if let Some(value) = patch.search_description {
            self.search_description = value;
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub scoring: Option<ScoringPatch>,
    pub pipeline: Option<PipelinePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringPatch {
    pub base: Option<i32>,
    pub open_bonus: Option<i32>,
    pub broad_scope_bonus: Option<i32>,
    pub few_requirements_bonus: Option<i32>,
    pub few_requirements_limit: Option<usize>,
    pub favorable_use_bonus: Option<i32>,
    pub floor: Option<i32>,
    pub ceiling: Option<i32>,
    pub favorable_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PipelinePatch {
    pub default_sort: Option<SortKey>,
    pub default_min_score: Option<f64>,
    pub search_description: Option<bool>,
}

fn env_bool(value: Option<String>) -> Option<bool> {
    value.map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_f64(key: &str, value: Option<String>) -> Result<Option<f64>> {
    match value {
        Some(value) => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|err| FacetRankError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}

fn env_list(value: Option<String>) -> Option<Vec<String>> {
    value.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.scoring.weights, ScoringWeights::default());
        assert_eq!(
            config.scoring.favorable_keywords,
            ["Energy", "Solar", "Repair", "Mitigation"]
        );
        assert_eq!(config.pipeline.default_sort, SortKey::DateClosingDesc);
        assert!(config.pipeline.search_description);
    }

    #[test]
    fn partial_toml_merges_over_defaults() {
        let config = Config::from_toml(
            r#"
            [scoring]
            open_bonus = 20
            favorable_keywords = ["Wind"]

            [pipeline]
            default_sort = "statusPriority"
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.weights.open_bonus, 20);
        assert_eq!(config.scoring.weights.base, 65);
        assert_eq!(config.scoring.favorable_keywords, ["Wind"]);
        assert_eq!(config.pipeline.default_sort, SortKey::StatusPriority);
        assert!(config.pipeline.search_description);
    }

    #[test]
    fn inverted_clamp_is_rejected() {
        let err = Config::from_toml("[scoring]\nfloor = 90\nceiling = 50\n").unwrap_err();
        assert!(matches!(err, FacetRankError::Config(_)));
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let err = Config::from_toml("[scoring]\nbase = 2147483647\n").unwrap_err();
        assert!(matches!(err, FacetRankError::Config(_)));
        assert!(err.to_string().contains("scoring.base"));

        let err = Config::from_toml("[scoring]\nopen_bonus = -101\n").unwrap_err();
        assert!(err.to_string().contains("scoring.open_bonus"));
    }

    #[test]
    fn clamp_outside_hard_bounds_is_rejected() {
        let err = Config::from_toml("[scoring]\nfloor = 0\nceiling = 100\n").unwrap_err();
        assert!(matches!(err, FacetRankError::Config(_)));
        assert!(Config::from_toml("[scoring]\nfloor = 50\nceiling = 90\n").is_ok());
    }

    #[test]
    fn unparseable_toml_is_config_error() {
        let err = Config::from_toml("[scoring\nbase = ").unwrap_err();
        assert!(err.to_string().contains("parse config"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[pipeline]\ndefault_min_score = 70\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!((config.pipeline.default_min_score - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, FacetRankError::MissingConfig(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_env_overrides(lookup(&[
                ("FACETRANK_FAVORABLE_KEYWORDS", "Wind, Flood ,"),
                ("FACETRANK_DEFAULT_SORT", "title_asc"),
                ("FACETRANK_DEFAULT_MIN_SCORE", "60"),
                ("FACETRANK_SEARCH_DESCRIPTION", "off"),
            ]))
            .unwrap();
        assert_eq!(config.scoring.favorable_keywords, ["Wind", "Flood"]);
        assert_eq!(config.pipeline.default_sort, SortKey::TitleAsc);
        assert!((config.pipeline.default_min_score - 60.0).abs() < f64::EPSILON);
        assert!(!config.pipeline.search_description);
    }

    #[test]
    fn invalid_env_number_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(lookup(&[("FACETRANK_DEFAULT_MIN_SCORE", "high")]))
            .unwrap_err();
        assert!(err.to_string().contains("FACETRANK_DEFAULT_MIN_SCORE"));
    }

    #[test]
    fn serializes_scoring_table_flat() {
        let toml = toml::to_string(&Config::default()).unwrap();
        assert!(toml.contains("[scoring]"));
        assert!(toml.contains("base = 65"));
        assert!(toml.contains("default_sort = \"dateClosingDesc\""));
    }
}
