//! Record shapes the engine filters and ranks.
//!
//! The engine only talks to records through [`Record`]. Two concrete kinds
//! ship with the crate:
//! - [`Opportunity`]: a grant-like listing with an application window.
//! - [`Provider`]: an agent/professional listing with a rating.

use chrono::{DateTime, Utc};

pub mod lenient;
pub mod opportunity;
pub mod provider;

pub use opportunity::Opportunity;
pub use provider::Provider;

/// Names of the multi-valued facets known to the bundled record kinds.
pub mod facet {
    pub const USES: &str = "uses";
    pub const ELIGIBILITY: &str = "eligibilityRequirements";
    pub const COMPATIBILITY: &str = "compatibilityTags";
    pub const SPECIALTIES: &str = "specialties";
    pub const CERTIFICATIONS: &str = "certifications";
}

/// Names of the numeric fields threshold filters read.
pub mod metric {
    pub const RATING: &str = "rating";
    pub const RESPONSE_HOURS: &str = "responseHours";
}

/// Application window of a record. Either bound may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub const fn new(opens_at: Option<DateTime<Utc>>, closes_at: Option<DateTime<Utc>>) -> Self {
        Self {
            opens_at,
            closes_at,
        }
    }
}

/// Minimal shape a listing must expose to be filtered, scored and sorted.
///
/// Every accessor except the identity fields has a neutral default, so a
/// record kind only implements what it actually carries. Missing data must
/// be reported as empty/`None`, never by panicking.
pub trait Record {
    /// Multi-valued facets indexed for selector population.
    const FACETS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Display title (grant title, agent name).
    fn title(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn window(&self) -> DateWindow {
        DateWindow::default()
    }

    /// Single-valued categorical facet.
    fn kind(&self) -> Option<&str> {
        None
    }

    /// Values of a multi-valued facet; unknown facets are empty.
    fn facet(&self, _name: &str) -> &[String] {
        &[]
    }

    /// Numeric field read by threshold filters and sorters.
    fn metric(&self, _name: &str) -> Option<f64> {
        None
    }

    /// Broad geographic scope (nationwide, remote).
    fn is_broad_scope(&self) -> bool {
        false
    }

    fn is_online(&self) -> Option<bool> {
        None
    }

    /// Entries a candidate must satisfy; fewer means easier to qualify.
    fn requirements(&self) -> &[String] {
        &[]
    }

    /// Use/category entries checked against the favorable keyword list.
    fn uses(&self) -> &[String] {
        &[]
    }
}
