//! Grant-like listings with an application window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DateWindow, Record, facet, lenient};

/// A funding opportunity (grant, rebate, loan programme).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::instant")]
    pub opens_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::instant")]
    pub closes_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nationwide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub uses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub eligibility_requirements: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub compatibility_tags: Vec<String>,
    /// Programme type, e.g. `grant`, `rebate`, `loan`, `tax-credit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Display amount such as "Up to $10,000".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

impl Opportunity {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_window(
        mut self,
        opens_at: Option<DateTime<Utc>>,
        closes_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.opens_at = opens_at;
        self.closes_at = closes_at;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn nationwide(mut self, nationwide: bool) -> Self {
        self.is_nationwide = Some(nationwide);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_uses<I, S>(mut self, uses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uses = uses.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligibility_requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compatibility_tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Record for Opportunity {
    const FACETS: &'static [&'static str] = &[facet::USES, facet::ELIGIBILITY, facet::COMPATIBILITY];

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn window(&self) -> DateWindow {
        DateWindow::new(self.opens_at, self.closes_at)
    }

    fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn facet(&self, name: &str) -> &[String] {
        match name {
            facet::USES => &self.uses,
            facet::ELIGIBILITY => &self.eligibility_requirements,
            facet::COMPATIBILITY => &self.compatibility_tags,
            _ => &[],
        }
    }

    fn is_broad_scope(&self) -> bool {
        self.is_nationwide.unwrap_or(false)
    }

    fn requirements(&self) -> &[String] {
        &self.eligibility_requirements
    }

    fn uses(&self) -> &[String] {
        &self.uses
    }
}
