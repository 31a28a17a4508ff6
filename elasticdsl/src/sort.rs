//! Sort directives
//!
//! A [`Sort`] is an ordered list of directives; the engine applies them in
//! the order they were appended, primary sort first.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::document::Clause;
use crate::error::require;
use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Where documents missing the sort field end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    First,
    Last,
}

impl Missing {
    fn as_str(self) -> &'static str {
        match self {
            Self::First => "_first",
            Self::Last => "_last",
        }
    }
}

/// Ordered sort directives
///
/// Appenders work in place, so a rejected directive leaves the ones
/// already added untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sort(Vec<Value>);

impl Sort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare field name in the engine's default order, e.g. `"_score"`.
    pub fn by_name(&mut self, field: &str) -> crate::Result<&mut Self> {
        require(field, "field")?;
        Ok(self.push(Value::String(field.to_string())))
    }

    /// `{field: {"order": order}}`
    pub fn field(&mut self, field: &str, order: SortOrder) -> crate::Result<&mut Self> {
        require(field, "field")?;
        Ok(self.push_clause(field, json!({ "order": order })))
    }

    /// `{field: {"missing": "_first" | "_last"}}`
    pub fn missing(&mut self, field: &str, missing: Missing) -> crate::Result<&mut Self> {
        require(field, "field")?;
        Ok(self.push_clause(field, json!({ "missing": missing.as_str() })))
    }

    /// `{field: {"ignore_unmapped": true}}`
    pub fn ignore_unmapped(&mut self, field: &str) -> crate::Result<&mut Self> {
        require(field, "field")?;
        Ok(self.push_clause(field, json!({ "ignore_unmapped": true })))
    }

    /// Sort by distance from `location`, in `unit` (e.g. `"km"`).
    pub fn geo_distance(
        &mut self,
        field: &str,
        location: GeoPoint,
        unit: &str,
        order: SortOrder,
    ) -> crate::Result<&mut Self> {
        require(field, "field")?;
        require(unit, "unit")?;
        let mut body = Map::new();
        body.insert(field.to_string(), serde_json::to_value(&location)?);
        body.insert("unit".to_string(), json!(unit));
        body.insert("order".to_string(), json!(order));
        Ok(self.push_clause("_geo_distance", Value::Object(body)))
    }

    /// Sort by the value a script computes; `field_type` is the script's
    /// result type (`"number"`, `"string"`).
    pub fn script(
        &mut self,
        script: &str,
        field_type: &str,
        params: Option<Map<String, Value>>,
        order: SortOrder,
    ) -> crate::Result<&mut Self> {
        require(script, "script")?;
        require(field_type, "type")?;
        let mut body = Map::new();
        body.insert("script".to_string(), json!(script));
        body.insert("type".to_string(), json!(field_type));
        if let Some(params) = params {
            body.insert("params".to_string(), Value::Object(params));
        }
        body.insert("order".to_string(), json!(order));
        Ok(self.push_clause("_script", Value::Object(body)))
    }

    /// Keep computing scores while sorting on fields.
    pub fn track_scores(&mut self) -> &mut Self {
        self.push_clause("track_scores", Value::Bool(true))
    }

    fn push_clause(&mut self, key: &str, body: Value) -> &mut Self {
        self.push(Clause::new(key, body).into_value())
    }

    fn push(&mut self, directive: Value) -> &mut Self {
        self.0.push(directive);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Directives in application order; bare names are JSON strings.
    pub fn directives(&self) -> &[Value] {
        &self.0
    }
}
