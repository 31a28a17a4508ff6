//! Facet requests
//!
//! Facets are named by the caller so several can travel in one request;
//! [`Facets`] keys them by that name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Clause;
use crate::error::{require, require_non_empty, Error};

/// Ordering of terms facet entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermsOrder {
    Count,
    Term,
    ReverseCount,
    ReverseTerm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TermsFacetOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<TermsOrder>,
    /// Include terms with a zero count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_terms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_flags: Option<String>,
}

/// One bucket of a range facet; at least one bound must be set
///
/// Bounds are any JSON value the field accepts: numbers or date strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
}

impl FacetRange {
    pub fn below(to: impl Into<Value>) -> Self {
        Self {
            from: None,
            to: Some(to.into()),
        }
    }

    pub fn at_least(from: impl Into<Value>) -> Self {
        Self {
            from: Some(from.into()),
            to: None,
        }
    }

    pub fn between(from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    fn is_unbounded(&self) -> bool {
        let unset = |bound: &Option<Value>| bound.as_ref().map_or(true, Value::is_null);
        unset(&self.from) && unset(&self.to)
    }
}

#[derive(Serialize)]
struct TermsBody<'a> {
    field: &'a str,
    #[serde(flatten)]
    options: &'a TermsFacetOptions,
}

#[derive(Serialize)]
struct RangeBody<'a> {
    field: &'a str,
    ranges: &'a [FacetRange],
}

/// A named facet request
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    name: String,
    body: Clause,
}

impl Facet {
    /// The N most frequent terms of `field`.
    pub fn terms(name: &str, field: &str, options: TermsFacetOptions) -> crate::Result<Self> {
        require(name, "name")?;
        require(field, "field")?;
        let body = TermsBody {
            field,
            options: &options,
        };
        Ok(Self {
            name: name.to_string(),
            body: Clause::from_body("terms", &body)?,
        })
    }

    /// Document counts per bucket of `ranges` over `field`.
    pub fn range(name: &str, field: &str, ranges: Vec<FacetRange>) -> crate::Result<Self> {
        require(name, "name")?;
        require(field, "field")?;
        require_non_empty(&ranges, "ranges")?;
        if let Some(pos) = ranges.iter().position(FacetRange::is_unbounded) {
            return Err(Error::InvalidValue {
                field: "ranges",
                reason: format!("entry {} has neither a from nor a to bound", pos),
            });
        }
        let body = RangeBody {
            field,
            ranges: &ranges,
        };
        Ok(Self {
            name: name.to_string(),
            body: Clause::from_body("range", &body)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Clause {
        &self.body
    }

    /// `{name: {<facet type>: {...}}}`
    pub fn to_document(&self) -> Clause {
        Clause::new(self.name.clone(), self.body.to_value())
    }
}

/// Facet requests keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Facets(Map<String, Value>);

impl Facets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facet; a facet with the same name is replaced.
    pub fn with(mut self, facet: Facet) -> Self {
        self.insert(facet);
        self
    }

    pub fn insert(&mut self, facet: Facet) -> Option<Value> {
        self.0.insert(facet.name, facet.body.into_value())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl FromIterator<Facet> for Facets {
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        let mut facets = Self::new();
        for facet in iter {
            facets.insert(facet);
        }
        facets
    }
}
