//! Clause documents
//!
//! A [`Clause`] is a JSON object with exactly one top-level key naming the
//! construct it expresses (`"term"`, `"range"`, `"bool"`, ...). Builders only
//! ever produce clauses; composite builders embed them verbatim.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Error;

/// One query, filter, facet or sort directive as a single-key JSON object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Clause(Map<String, Value>);

impl Clause {
    /// Create a clause named `key` whose body is `body`.
    pub fn new(key: impl Into<String>, body: Value) -> Self {
        let mut map = Map::with_capacity(1);
        map.insert(key.into(), body);
        Self(map)
    }

    /// Create a clause whose body is a serializable options struct.
    pub(crate) fn from_body<T: Serialize>(key: &str, body: &T) -> crate::Result<Self> {
        Ok(Self::new(key, serde_json::to_value(body)?))
    }

    /// Create a `{key: {field: body}}` clause, the shape shared by most
    /// per-field constructs.
    pub(crate) fn per_field<T: Serialize>(key: &str, field: &str, body: &T) -> crate::Result<Self> {
        let mut inner = Map::with_capacity(1);
        inner.insert(field.to_string(), serde_json::to_value(body)?);
        Ok(Self::new(key, Value::Object(inner)))
    }

    /// The construct name, i.e. the single top-level key.
    pub fn key(&self) -> &str {
        self.0.keys().next().map(String::as_str).unwrap_or_default()
    }

    /// The value stored under the construct name.
    pub fn body(&self) -> Option<&Value> {
        self.0.values().next()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Clause> for Value {
    fn from(clause: Clause) -> Self {
        clause.into_value()
    }
}

/// Accepts externally built documents, e.g. clauses read back from JSON.
impl TryFrom<Value> for Clause {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(map) if map.len() == 1 => Ok(Self(map)),
            Value::Object(map) => Err(Error::InvalidValue {
                field: "clause",
                reason: format!("expected exactly one top-level key, found {}", map.len()),
            }),
            other => Err(Error::InvalidValue {
                field: "clause",
                reason: format!("expected a JSON object, found {}", other),
            }),
        }
    }
}

/// Render a list of clauses as a JSON array, preserving order.
pub(crate) fn clause_array<C: Into<Clause>>(clauses: impl IntoIterator<Item = C>) -> Value {
    Value::Array(
        clauses
            .into_iter()
            .map(|c| Into::<Clause>::into(c).into_value())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_has_single_key() {
        let clause = Clause::new("match_all", json!({}));
        assert_eq!(clause.key(), "match_all");
        assert_eq!(clause.body(), Some(&json!({})));
        assert_eq!(clause.into_value(), json!({"match_all": {}}));
    }

    #[test]
    fn test_per_field_shape() {
        let clause = Clause::per_field("prefix", "user", &"ki").unwrap();
        assert_eq!(serde_json::to_value(&clause).unwrap(), json!({"prefix": {"user": "ki"}}));
    }

    #[test]
    fn test_try_from_value() {
        let clause = Clause::try_from(json!({"term": {"user": "kimchy"}})).unwrap();
        assert_eq!(clause.key(), "term");

        let err = Clause::try_from(json!({"query": {}, "size": 10})).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { field: "clause", .. }));

        assert!(Clause::try_from(json!([1, 2])).is_err());
        assert!(Clause::try_from(json!({})).is_err());
    }

    #[test]
    fn test_clause_array_keeps_order() {
        let arr = clause_array(vec![
            Clause::new("a", json!(1)),
            Clause::new("b", json!(2)),
        ]);
        assert_eq!(arr, json!([{"a": 1}, {"b": 2}]));
    }
}
