//! Field mapping declarations
//!
//! A [`FieldMapping`] describes one field, addressed by a dot-delimited path.
//! Each path segment becomes one level of `properties` nesting, so
//! `pin.location` renders as
//! `{"properties": {"pin": {"properties": {"location": {...}}}}}`.
//! A [`TypeMapping`] merges several field mappings into the body of a
//! put-mapping request.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{require, Error};

/// Core field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Null,
    Date,
    Binary,
    Ip,
    GeoPoint,
    Object,
    Nested,
}

/// Term vector storage mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TermVector {
    No,
    Yes,
    WithOffsets,
    WithPositions,
    WithPositionsOffsets,
}

impl From<bool> for TermVector {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Mapping of a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    path: Vec<String>,
    options: Map<String, Value>,
}

impl FieldMapping {
    /// Start a mapping for the field at `path` (e.g. `"pin.location"`).
    pub fn new(path: &str) -> crate::Result<Self> {
        require(path, "field")?;
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::InvalidValue {
                field: "field",
                reason: format!("'{}' contains an empty path segment", path),
            });
        }
        Ok(Self {
            path: segments,
            options: Map::new(),
        })
    }

    fn set(mut self, key: &str, value: Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    pub fn field_type(self, field_type: FieldType) -> Self {
        self.set("type", json!(field_type))
    }

    /// `index: analyzed` or `index: not_analyzed`
    pub fn analyzed(self, analyzed: bool) -> Self {
        let mode = if analyzed { "analyzed" } else { "not_analyzed" };
        self.set("index", json!(mode))
    }

    /// Keep the field out of the index. Drops every option set so far.
    pub fn ignore(mut self) -> Self {
        self.options.clear();
        self.set("index", json!("no"))
    }

    /// Value indexed in place of an explicit null.
    pub fn null_value(self, value: impl Into<Value>) -> Self {
        self.set("null_value", value.into())
    }

    pub fn term_vector(self, mode: impl Into<TermVector>) -> Self {
        self.set("term_vector", json!(mode.into()))
    }

    pub fn boost(self, boost: f64) -> Self {
        self.set("boost", json!(boost))
    }

    pub fn omit_norms(self, omit: bool) -> Self {
        self.set("omit_norms", json!(omit))
    }

    pub fn omit_term_freq_and_positions(self, omit: bool) -> Self {
        self.set("omit_term_freq_and_positions", json!(omit))
    }

    /// Analyzer for indexing and, unless overridden, searching.
    pub fn analyzer(self, analyzer: &str) -> Self {
        self.set("analyzer", json!(analyzer))
    }

    pub fn search_analyzer(self, analyzer: &str) -> Self {
        self.set("search_analyzer", json!(analyzer))
    }

    /// Whether the field is copied into the `_all` field.
    pub fn include_in_all(self, include: bool) -> Self {
        self.set("include_in_all", json!(include))
    }

    pub fn path(&self) -> String {
        self.path.join(".")
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// The nested property declaration, innermost segment deepest.
    pub fn to_document(&self) -> Value {
        self.path
            .iter()
            .rev()
            .fold(Value::Object(self.options.clone()), |inner, segment| {
                json!({ "properties": { segment.as_str(): inner } })
            })
    }
}

/// Field mappings of one document type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMapping {
    properties: Map<String, Value>,
}

impl TypeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a field mapping in. Sibling fields under a shared parent are
    /// kept; redeclaring a field overwrites the options it sets again.
    pub fn field(mut self, mapping: FieldMapping) -> Self {
        if let Value::Object(mut doc) = mapping.to_document() {
            if let Some(Value::Object(props)) = doc.remove("properties") {
                merge_into(&mut self.properties, props);
            }
        }
        self
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Body of `PUT /{index}/{type}/_mapping`: `{type: {"properties": ..}}`
    pub fn to_body(&self, doc_type: &str) -> Value {
        json!({ doc_type: { "properties": Value::Object(self.properties.clone()) } })
    }
}

impl FromIterator<FieldMapping> for TypeMapping {
    fn from_iter<I: IntoIterator<Item = FieldMapping>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::field)
    }
}

fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_path_nests_deepest_first() {
        let m = FieldMapping::new("pin.location")
            .unwrap()
            .field_type(FieldType::GeoPoint);
        assert_eq!(
            m.to_document(),
            json!({"properties": {"pin": {"properties": {"location": {"type": "geo_point"}}}}})
        );
    }

    #[test]
    fn test_single_segment() {
        let m = FieldMapping::new("title")
            .unwrap()
            .field_type(FieldType::String)
            .analyzed(false)
            .null_value("na")
            .boost(2.0)
            .term_vector(TermVector::WithPositionsOffsets)
            .analyzer("standard")
            .search_analyzer("simple")
            .include_in_all(false)
            .omit_norms(true)
            .omit_term_freq_and_positions(false);
        assert_eq!(
            m.to_document(),
            json!({"properties": {"title": {
                "type": "string",
                "index": "not_analyzed",
                "null_value": "na",
                "boost": 2.0,
                "term_vector": "with_positions_offsets",
                "analyzer": "standard",
                "search_analyzer": "simple",
                "include_in_all": false,
                "omit_norms": true,
                "omit_term_freq_and_positions": false
            }}})
        );
    }

    #[test]
    fn test_only_supplied_options_emitted() {
        let m = FieldMapping::new("body").unwrap();
        assert_eq!(m.to_document(), json!({"properties": {"body": {}}}));
    }

    #[test]
    fn test_ignore_collapses_options() {
        let m = FieldMapping::new("secret")
            .unwrap()
            .field_type(FieldType::String)
            .ignore();
        assert_eq!(m.to_document(), json!({"properties": {"secret": {"index": "no"}}}));
    }

    #[test]
    fn test_term_vector_from_bool() {
        let m = FieldMapping::new("a").unwrap().term_vector(true);
        assert_eq!(m.options().get("term_vector"), Some(&json!("yes")));
        let m = FieldMapping::new("a").unwrap().term_vector(false);
        assert_eq!(m.options().get("term_vector"), Some(&json!("no")));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(matches!(FieldMapping::new(""), Err(Error::MissingField("field"))));
        assert!(matches!(
            FieldMapping::new("pin..location"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(FieldMapping::new(".location").is_err());
    }

    #[test]
    fn test_type_mapping_merges_siblings() {
        let mapping: TypeMapping = vec![
            FieldMapping::new("pin.location").unwrap().field_type(FieldType::GeoPoint),
            FieldMapping::new("pin.label").unwrap().field_type(FieldType::String),
            FieldMapping::new("age").unwrap().field_type(FieldType::Integer),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            mapping.to_body("tweet"),
            json!({"tweet": {"properties": {
                "pin": {"properties": {
                    "location": {"type": "geo_point"},
                    "label": {"type": "string"}
                }},
                "age": {"type": "integer"}
            }}})
        );
    }

    #[test]
    fn test_type_mapping_redeclare_overwrites() {
        let mapping = TypeMapping::new()
            .field(FieldMapping::new("age").unwrap().field_type(FieldType::Integer))
            .field(FieldMapping::new("age").unwrap().field_type(FieldType::Long));
        assert_eq!(mapping.properties().get("age"), Some(&json!({"type": "long"})));
    }
}
