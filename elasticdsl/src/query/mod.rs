//! Query clause builders
//!
//! Each constructor emits one [`Query`] whose single top-level key names the
//! query type. Constructors with a mandatory input return
//! [`Result`](crate::Result) and fail with
//! [`Error::MissingField`](crate::Error::MissingField) when it is empty.
//!
//! ```
//! use elasticdsl::query::{BoolQuery, Query};
//!
//! let query = Query::bool(
//!     BoolQuery::new()
//!         .must(Query::term([("user", "kimchy")])?)
//!         .must_not(Query::wildcard("tag", "spam*")?),
//! );
//! assert_eq!(query.key(), "bool");
//! # Ok::<(), elasticdsl::Error>(())
//! ```

mod types;

pub use types::*;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::document::{clause_array, Clause};
use crate::error::{require, require_non_empty, Error};
use crate::filter::Filter;

/// A query clause document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Query(Clause);

#[derive(Serialize)]
struct TextBody<'a, O: Serialize> {
    query: &'a str,
    #[serde(flatten)]
    options: O,
}

#[derive(Serialize)]
struct ValueBody<'a, O: Serialize> {
    value: &'a Value,
    #[serde(flatten)]
    options: &'a O,
}

#[derive(Serialize)]
struct LikeTextBody<'a, O: Serialize> {
    like_text: &'a str,
    #[serde(flatten)]
    options: &'a O,
}

#[derive(Serialize)]
struct MatchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    operator: Option<Operator>,
}

#[derive(Serialize)]
struct RangeBody<'a> {
    #[serde(flatten)]
    bounds: &'a RangeBounds,
    #[serde(skip_serializing_if = "Option::is_none")]
    boost: Option<f64>,
}

impl Query {
    /// Wrap an externally built clause without inspecting it.
    pub fn from_clause(clause: Clause) -> Self {
        Self(clause)
    }

    pub fn key(&self) -> &str {
        self.0.key()
    }

    pub fn as_clause(&self) -> &Clause {
        &self.0
    }

    pub fn into_clause(self) -> Clause {
        self.0
    }

    pub fn to_value(&self) -> Value {
        self.0.to_value()
    }

    /// Exact, not analyzed, term match.
    ///
    /// One field/value pair emits `term`; more than one emits `terms`
    /// carrying every pair.
    pub fn term<I, K, V>(pairs: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut fields = Map::new();
        for (field, value) in pairs {
            let field = field.into();
            require(&field, "field")?;
            if fields.contains_key(&field) {
                return Err(Error::InvalidValue {
                    field: "field",
                    reason: format!("duplicate field '{}'", field),
                });
            }
            fields.insert(field, value.into());
        }
        let key = match fields.len() {
            0 => return Err(Error::MissingField("field")),
            1 => "term",
            _ => "terms",
        };
        Ok(Self(Clause::new(key, Value::Object(fields))))
    }

    /// Match any of several terms on one field.
    pub fn terms<V: Into<Value>>(
        field: &str,
        values: impl IntoIterator<Item = V>,
        minimum_match: Option<u32>,
    ) -> crate::Result<Self> {
        require(field, "field")?;
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        require_non_empty(&values, "values")?;

        let mut body = Map::new();
        body.insert(field.to_string(), Value::Array(values));
        if let Some(n) = minimum_match {
            body.insert("minimum_match".to_string(), json!(n));
        }
        Ok(Self(Clause::new("terms", Value::Object(body))))
    }

    /// Query-string query pinned to a single field.
    pub fn field(field: &str, query: &str, options: FieldQueryOptions) -> crate::Result<Self> {
        require(field, "field")?;
        require(query, "query")?;
        let body = TextBody { query, options };
        Ok(Self(Clause::per_field("field", field, &body)?))
    }

    /// Deprecated alias of [`Query::match_query`]; always rejected.
    pub fn text(_field: &str, _query: &str, _operator: Option<Operator>) -> crate::Result<Self> {
        Err(Error::NotSupported(
            "the text query is deprecated, use match_query".to_string(),
        ))
    }

    /// Analyzed full-text match on one field.
    pub fn match_query(field: &str, query: &str, operator: Option<Operator>) -> crate::Result<Self> {
        require(field, "field")?;
        require(query, "query")?;
        let body = TextBody {
            query,
            options: MatchOptions { operator },
        };
        Ok(Self(Clause::per_field("match", field, &body)?))
    }

    /// Boolean combination of previously built queries, embedded verbatim.
    pub fn bool(clauses: BoolQuery) -> Self {
        let mut body = Map::new();
        if !clauses.must.is_empty() {
            body.insert("must".to_string(), clause_array(clauses.must));
        }
        if !clauses.should.is_empty() {
            body.insert("should".to_string(), clause_array(clauses.should));
        }
        if !clauses.must_not.is_empty() {
            body.insert("must_not".to_string(), clause_array(clauses.must_not));
        }
        if let Some(n) = clauses.minimum_number_should_match {
            body.insert("minimum_number_should_match".to_string(), json!(n));
        }
        if let Some(boost) = clauses.boost {
            body.insert("boost".to_string(), json!(boost));
        }
        Self(Clause::new("bool", Value::Object(body)))
    }

    /// Documents with the given ids, optionally restricted to one type.
    pub fn ids<S: Into<String>>(
        values: impl IntoIterator<Item = S>,
        doc_type: Option<&str>,
    ) -> crate::Result<Self> {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        require_non_empty(&values, "values")?;

        let mut body = Map::new();
        body.insert("values".to_string(), json!(values));
        if let Some(t) = doc_type {
            body.insert("type".to_string(), json!(t));
        }
        Ok(Self(Clause::new("ids", Value::Object(body))))
    }

    /// Levenshtein-distance match on one field.
    pub fn fuzzy(
        field: &str,
        value: impl Into<Value>,
        options: FuzzyOptions,
    ) -> crate::Result<Self> {
        require(field, "field")?;
        let value = value.into();
        if value.is_null() {
            return Err(Error::MissingField("value"));
        }
        let body = ValueBody {
            value: &value,
            options: &options,
        };
        Ok(Self(Clause::per_field("fuzzy", field, &body)?))
    }

    pub fn fuzzy_like_this(like_text: &str, options: FuzzyLikeThisOptions) -> crate::Result<Self> {
        require(like_text, "like_text")?;
        let body = LikeTextBody {
            like_text,
            options: &options,
        };
        Ok(Self(Clause::from_body("fuzzy_like_this", &body)?))
    }

    /// Parent documents whose children of `child_type` match `query`.
    pub fn has_child(child_type: &str, query: Query) -> crate::Result<Self> {
        require(child_type, "type")?;
        Ok(Self(Clause::new(
            "has_child",
            json!({ "type": child_type, "query": query.0.into_value() }),
        )))
    }

    pub fn match_all() -> Self {
        Self(Clause::new("match_all", json!({})))
    }

    /// Documents "like" the seed text.
    pub fn more_like_this(like_text: &str, options: MoreLikeThisOptions) -> crate::Result<Self> {
        require(like_text, "like_text")?;
        let body = LikeTextBody {
            like_text,
            options: &options,
        };
        Ok(Self(Clause::from_body("more_like_this", &body)?))
    }

    /// Terms starting with `prefix` (not analyzed).
    pub fn prefix(field: &str, prefix: &str) -> crate::Result<Self> {
        require(field, "field")?;
        require(prefix, "prefix")?;
        Ok(Self(Clause::per_field("prefix", field, &prefix)?))
    }

    /// Query parsed by the engine's query parser.
    pub fn query_string(query: &str, options: QueryStringOptions) -> crate::Result<Self> {
        require(query, "query")?;
        let body = TextBody {
            query,
            options: &options,
        };
        Ok(Self(Clause::from_body("query_string", &body)?))
    }

    pub fn range(field: &str, bounds: RangeBounds, boost: Option<f64>) -> crate::Result<Self> {
        require(field, "field")?;
        let body = RangeBody {
            bounds: &bounds,
            boost,
        };
        Ok(Self(Clause::per_field("range", field, &body)?))
    }

    /// Wildcard match (`*` and `?`) on one field.
    pub fn wildcard(field: &str, pattern: &str) -> crate::Result<Self> {
        require(field, "field")?;
        require(pattern, "pattern")?;
        Ok(Self(Clause::per_field("wildcard", field, &pattern)?))
    }

    /// Apply `filter` to the results of `query`.
    pub fn filtered(query: Query, filter: Filter) -> Self {
        Self(Clause::new(
            "filtered",
            json!({ "query": query.0.into_value(), "filter": filter.into_clause().into_value() }),
        ))
    }
}

impl From<Query> for Clause {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl From<Query> for Value {
    fn from(query: Query) -> Self {
        query.0.into_value()
    }
}
