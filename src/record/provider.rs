//! Agent/professional listings.

use serde::{Deserialize, Serialize};

use super::{Record, facet, lenient, metric};

/// An insurance agent or other professional offering services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    #[serde(alias = "displayName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// 0.0 - 5.0, one decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Typical response time bucket in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_hours: Option<u32>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub specialties: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub is_online: bool,
}

impl Provider {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub const fn with_response_hours(mut self, hours: u32) -> Self {
        self.response_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn with_specialties<I, S>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specialties = specialties.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_certifications<I, S>(mut self, certifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.certifications = certifications.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn online(mut self, online: bool) -> Self {
        self.is_online = online;
        self
    }
}

impl Record for Provider {
    const FACETS: &'static [&'static str] = &[facet::SPECIALTIES, facet::CERTIFICATIONS];

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.bio.as_deref().unwrap_or_default()
    }

    fn facet(&self, name: &str) -> &[String] {
        match name {
            facet::SPECIALTIES => &self.specialties,
            facet::CERTIFICATIONS => &self.certifications,
            _ => &[],
        }
    }

    fn metric(&self, name: &str) -> Option<f64> {
        match name {
            metric::RATING => self.rating,
            metric::RESPONSE_HOURS => self.response_hours.map(f64::from),
            _ => None,
        }
    }

    fn is_online(&self) -> Option<bool> {
        Some(self.is_online)
    }

    fn uses(&self) -> &[String] {
        &self.specialties
    }
}
