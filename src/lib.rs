//! Multi-facet filtering, free-text search and match-score ranking over
//! in-memory listing snapshots.
//!
//! The engine is generic over [`Record`]; [`Opportunity`] (grants) and
//! [`Provider`] (agents) ship with the crate. A run is
//! `collection -> facets -> predicate -> score -> min-score cutoff -> sort`:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use facetrank::{FilterCriteria, Opportunity, apply};
//!
//! let grants = vec![Opportunity::new("g1", "Solar Rebate").with_uses(["Solar"])];
//! let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
//! let output = apply(&grants, &FilterCriteria::new().with_search("solar"), now);
//! assert_eq!(output.results.len(), 1);
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod criteria;
pub mod error;
pub mod facets;
pub mod loader;
pub mod pipeline;
pub mod predicate;
pub mod record;
pub mod scoring;
pub mod sort;
pub mod status;

#[cfg(test)]
pub mod test_utils;

pub use criteria::{FilterCriteria, SortKey, StatusFilter};
pub use error::{FacetRankError, Result};
pub use facets::{FacetIndexer, FacetMap};
pub use pipeline::{FilterPipeline, PipelineOutput, PipelineSettings, RankedRecord, apply, apply_with};
pub use record::{Opportunity, Provider, Record};
pub use scoring::{MatchScore, ScoreCalculator, ScoringWeights};
pub use status::{Status, TimeRemaining};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
