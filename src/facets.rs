//! Facet value index for populating filter selectors.
//!
//! Always built from the full, unfiltered collection: picking a value in one
//! selector must not shrink the options offered by the others.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::record::Record;

/// Distinct values of one facet with the number of records carrying each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetValues {
    /// Sorted, deduplicated values.
    pub values: Vec<String>,
    pub counts: BTreeMap<String, usize>,
}

impl FacetValues {
    fn from_counts(counts: BTreeMap<String, usize>) -> Self {
        Self {
            values: counts.keys().cloned().collect(),
            counts,
        }
    }

    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.counts.contains_key(value)
    }
}

/// Every configured facet of a record kind, plus the `kind` values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetMap {
    pub facets: BTreeMap<String, FacetValues>,
    pub kinds: FacetValues,
}

impl FacetMap {
    /// Values of `facet`; empty for facets the record kind doesn't declare.
    pub fn values(&self, facet: &str) -> &[String] {
        self.facets
            .get(facet)
            .map(|f| f.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, facet: &str, value: &str) -> usize {
        self.facets.get(facet).map_or(0, |f| f.count(value))
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds.values
    }

    pub fn facet_names(&self) -> impl Iterator<Item = &str> {
        self.facets.keys().map(String::as_str)
    }
}

/// Builds a [`FacetMap`] from a snapshot collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetIndexer;

impl FacetIndexer {
    /// Index `R::FACETS` and `kind` over all `records`.
    ///
    /// A value repeated inside one record counts once for that record.
    pub fn index<R: Record>(records: &[R]) -> FacetMap {
        let mut facets: BTreeMap<String, BTreeMap<String, usize>> = R::FACETS
            .iter()
            .map(|name| ((*name).to_string(), BTreeMap::new()))
            .collect();
        let mut kinds: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            for (name, counts) in &mut facets {
                let distinct: BTreeSet<&String> = record.facet(name).iter().collect();
                for value in distinct {
                    *counts.entry(value.clone()).or_insert(0) += 1;
                }
            }
            if let Some(kind) = record.kind() {
                *kinds.entry(kind.to_string()).or_insert(0) += 1;
            }
        }

        let map = FacetMap {
            facets: facets
                .into_iter()
                .map(|(name, counts)| (name, FacetValues::from_counts(counts)))
                .collect(),
            kinds: FacetValues::from_counts(kinds),
        };
        debug!(
            records = records.len(),
            facets = map.facets.len(),
            kinds = map.kinds.values.len(),
            "indexed facets"
        );
        map
    }
}
