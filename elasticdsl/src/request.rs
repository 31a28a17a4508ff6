//! Top-level search request body

use serde::Serialize;
use serde_json::Value;

use crate::facet::{Facet, Facets};
use crate::filter::Filter;
use crate::query::Query;
use crate::sort::Sort;

/// Search request body
///
/// Only the parts that were set are serialized; an empty request renders
/// as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,

    /// Starting offset of the returned hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,

    /// Maximum number of hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Facets::is_empty")]
    pub facets: Facets,

    /// Engine-side search timeout, e.g. `"5s"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: Query) -> Self {
        Self::new().query(query)
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn from(mut self, offset: u64) -> Self {
        self.from = Some(offset);
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add one named facet; a facet with the same name is replaced.
    pub fn facet(mut self, facet: Facet) -> Self {
        self.facets.insert(facet);
        self
    }

    pub fn facets(mut self, facets: Facets) -> Self {
        self.facets = facets;
        self
    }

    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
