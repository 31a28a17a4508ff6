//! Option types for query clauses
//!
//! Every optional parameter is an `Option` that is skipped during
//! serialization when unset, so the engine's own default applies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Query;

/// Boolean operator for match and query_string queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MinimumShouldMatch {
    Number(i32),
    Percentage(String),
}

impl From<i32> for MinimumShouldMatch {
    fn from(n: i32) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for MinimumShouldMatch {
    fn from(s: &str) -> Self {
        Self::Percentage(s.to_string())
    }
}

/// Bounds shared by range queries and range / numeric_range filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_lower: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_upper: Option<bool>,
}

impl RangeBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, value: impl Into<Value>) -> Self {
        self.from = Some(value.into());
        self
    }

    pub fn to(mut self, value: impl Into<Value>) -> Self {
        self.to = Some(value.into());
        self
    }

    pub fn include_lower(mut self, include: bool) -> Self {
        self.include_lower = Some(include);
        self
    }

    pub fn include_upper(mut self, include: bool) -> Self {
        self.include_upper = Some(include);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldQueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_position_increments: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuzzyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuzzyLikeThisOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_tf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_terms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

/// Tunables for the more_like_this query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoreLikeThisOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_terms_to_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_term_freq: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_terms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_doc_freq: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_doc_freq: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_word_len: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_word_len: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_terms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

/// Parser flags for the query_string query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryStringOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_leading_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowercase_expanded_terms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_position_increments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_min_sim: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_slop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_phrase_queries: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
}

/// Sub-clauses and tunables of a bool query
///
/// Empty clause lists are left out of the emitted document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub should: Vec<Query>,
    pub must_not: Vec<Query>,
    pub minimum_number_should_match: Option<u32>,
    pub boost: Option<f64>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: Query) -> Self {
        self.must.push(query);
        self
    }

    pub fn should(mut self, query: Query) -> Self {
        self.should.push(query);
        self
    }

    pub fn must_not(mut self, query: Query) -> Self {
        self.must_not.push(query);
        self
    }

    pub fn minimum_number_should_match(mut self, n: u32) -> Self {
        self.minimum_number_should_match = Some(n);
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}
