//! Shared test utilities for facetrank.

pub mod arbitrary;
pub mod fixtures;
