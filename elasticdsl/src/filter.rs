//! Filter clause builders
//!
//! Filters follow the same construction policy as queries: a missing
//! mandatory input is an error, never a silently empty document. The
//! composite filters (`and`, `or`, `not`, `bool`) accept any clause, so query
//! clauses can be combined with filter clauses.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::document::{clause_array, Clause};
use crate::error::{require, require_non_empty, Error};
use crate::geo::{DistanceType, GeoPoint};
use crate::query::{Query, RangeBounds};

/// A filter clause document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter(Clause);

/// Sub-clauses of a bool filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolFilter {
    pub must: Vec<Clause>,
    pub should: Vec<Clause>,
    pub must_not: Vec<Clause>,
}

impl BoolFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, clause: impl Into<Clause>) -> Self {
        self.must.push(clause.into());
        self
    }

    pub fn should(mut self, clause: impl Into<Clause>) -> Self {
        self.should.push(clause.into());
        self
    }

    pub fn must_not(mut self, clause: impl Into<Clause>) -> Self {
        self.must_not.push(clause.into());
        self
    }
}

#[derive(Serialize)]
struct GeoBox<'a> {
    top_left: &'a GeoPoint,
    bottom_right: &'a GeoPoint,
}

impl Filter {
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

    /// Documents matching every clause.
    pub fn and<C: Into<Clause>>(clauses: impl IntoIterator<Item = C>) -> crate::Result<Self> {
        Self::combine("and", clauses)
    }

    /// Documents matching at least one clause.
    pub fn or<C: Into<Clause>>(clauses: impl IntoIterator<Item = C>) -> crate::Result<Self> {
        Self::combine("or", clauses)
    }

    fn combine<C: Into<Clause>>(
        key: &str,
        clauses: impl IntoIterator<Item = C>,
    ) -> crate::Result<Self> {
        let clauses: Vec<Clause> = clauses.into_iter().map(Into::into).collect();
        require_non_empty(&clauses, "filters")?;
        Ok(Self(Clause::new(key, clause_array(clauses))))
    }

    /// Documents not matching `clause`.
    pub fn not(clause: impl Into<Clause>) -> Self {
        let clause: Clause = clause.into();
        Self(Clause::new("not", clause.into_value()))
    }

    pub fn bool(clauses: BoolFilter) -> Self {
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
        Self(Clause::new("bool", Value::Object(body)))
    }

    /// Documents where `field` has a value.
    pub fn exists(field: &str) -> crate::Result<Self> {
        require(field, "field")?;
        Ok(Self(Clause::new("exists", json!({ "field": field }))))
    }

    /// Documents where `field` has no value.
    pub fn missing(field: &str) -> crate::Result<Self> {
        require(field, "field")?;
        Ok(Self(Clause::new("missing", json!({ "field": field }))))
    }

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

    /// Limit the number of documents (per shard) to execute on.
    pub fn limit(value: u64) -> crate::Result<Self> {
        if value == 0 {
            return Err(Error::InvalidValue {
                field: "value",
                reason: "limit must be positive".to_string(),
            });
        }
        Ok(Self(Clause::new("limit", json!({ "value": value }))))
    }

    /// Documents of the given mapping type.
    pub fn doc_type(value: &str) -> crate::Result<Self> {
        require(value, "value")?;
        Ok(Self(Clause::new("type", json!({ "value": value }))))
    }

    pub fn geo_bounding_box(
        field: &str,
        top_left: GeoPoint,
        bottom_right: GeoPoint,
    ) -> crate::Result<Self> {
        require(field, "field")?;
        require_point(&top_left, "top_left")?;
        require_point(&bottom_right, "bottom_right")?;
        let body = GeoBox {
            top_left: &top_left,
            bottom_right: &bottom_right,
        };
        Ok(Self(Clause::per_field("geo_bounding_box", field, &body)?))
    }

    /// Hits within `distance` (e.g. `"300km"`) of `center`.
    pub fn geo_distance(
        field: &str,
        center: GeoPoint,
        distance: &str,
        distance_type: Option<DistanceType>,
    ) -> crate::Result<Self> {
        require(field, "field")?;
        reject_reserved(field, &["distance", "distance_type"])?;
        require_point(&center, "center")?;
        require(distance, "distance")?;

        let mut body = Map::new();
        body.insert("distance".to_string(), json!(distance));
        if let Some(dt) = distance_type {
            body.insert("distance_type".to_string(), serde_json::to_value(dt)?);
        }
        body.insert(field.to_string(), serde_json::to_value(&center)?);
        Ok(Self(Clause::new("geo_distance", Value::Object(body))))
    }

    /// Hits between `from` and `to` away from `center`.
    pub fn geo_distance_range(
        field: &str,
        center: GeoPoint,
        from: &str,
        to: &str,
        distance_type: Option<DistanceType>,
    ) -> crate::Result<Self> {
        require(field, "field")?;
        reject_reserved(field, &["from", "to", "distance_type"])?;
        require_point(&center, "center")?;
        require(from, "from")?;
        require(to, "to")?;

        let mut body = Map::new();
        body.insert("from".to_string(), json!(from));
        body.insert("to".to_string(), json!(to));
        if let Some(dt) = distance_type {
            body.insert("distance_type".to_string(), serde_json::to_value(dt)?);
        }
        body.insert(field.to_string(), serde_json::to_value(&center)?);
        Ok(Self(Clause::new("geo_distance_range", Value::Object(body))))
    }

    /// Hits falling inside the polygon described by `points`.
    pub fn geo_polygon(field: &str, points: Vec<GeoPoint>) -> crate::Result<Self> {
        require(field, "field")?;
        require_non_empty(&points, "points")?;
        for point in &points {
            require_point(point, "points")?;
        }
        Ok(Self(Clause::per_field(
            "geo_polygon",
            field,
            &json!({ "points": points }),
        )?))
    }

    pub fn has_child(child_type: &str, query: Query) -> crate::Result<Self> {
        require(child_type, "type")?;
        Ok(Self(Clause::new(
            "has_child",
            json!({ "type": child_type, "query": query.into_clause().into_value() }),
        )))
    }

    pub fn match_all() -> Self {
        Self(Clause::new("match_all", json!({})))
    }

    pub fn numeric_range(field: &str, bounds: RangeBounds) -> crate::Result<Self> {
        require(field, "field")?;
        Ok(Self(Clause::per_field("numeric_range", field, &bounds)?))
    }

    pub fn range(field: &str, bounds: RangeBounds) -> crate::Result<Self> {
        require(field, "field")?;
        Ok(Self(Clause::per_field("range", field, &bounds)?))
    }

    pub fn prefix(field: &str, prefix: &str) -> crate::Result<Self> {
        require(field, "field")?;
        require(prefix, "prefix")?;
        Ok(Self(Clause::per_field("prefix", field, &prefix)?))
    }

    /// Use any query as a filter.
    pub fn query(query: Query) -> Self {
        Self(Clause::new("query", query.into_clause().into_value()))
    }

    /// Script filter, e.g. `doc["num1"].value > 1`.
    pub fn script(script: &str, params: Option<Map<String, Value>>) -> crate::Result<Self> {
        require(script, "script")?;
        let mut body = Map::new();
        body.insert("script".to_string(), json!(script));
        if let Some(params) = params {
            body.insert("params".to_string(), Value::Object(params));
        }
        Ok(Self(Clause::new("script", Value::Object(body))))
    }

    /// Exact term filter. An array value produces a `terms` filter.
    pub fn term(field: &str, value: impl Into<Value>) -> crate::Result<Self> {
        require(field, "field")?;
        match value.into() {
            Value::Null => Err(Error::MissingField("value")),
            Value::Array(values) => Self::terms(field, values),
            value => Ok(Self(Clause::per_field("term", field, &value)?)),
        }
    }

    pub fn terms<V: Into<Value>>(
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> crate::Result<Self> {
        require(field, "field")?;
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        require_non_empty(&values, "values")?;
        Ok(Self(Clause::per_field("terms", field, &values)?))
    }
}

/// Geo distance filters share one object between options and the point field.
fn reject_reserved(field: &str, reserved: &[&str]) -> crate::Result<()> {
    if reserved.contains(&field) {
        return Err(Error::InvalidValue {
            field: "field",
            reason: format!("'{}' is a reserved option name", field),
        });
    }
    Ok(())
}

fn require_point(point: &GeoPoint, field: &'static str) -> crate::Result<()> {
    if point.is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(())
}

impl From<Filter> for Clause {
    fn from(filter: Filter) -> Self {
        filter.0
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Self {
        filter.0.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json(f: &Filter) -> Value {
        serde_json::to_value(f).unwrap()
    }

    // ===================================================================
    // Composite filters
    // ===================================================================

    #[test]
    fn test_or_mixes_queries_and_filters() {
        let f = Filter::or([
            Clause::from(Query::term([("lastname", "Campbell")]).unwrap()),
            Clause::from(Filter::exists("firstname").unwrap()),
        ])
        .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"or": [
                {"term": {"lastname": "Campbell"}},
                {"exists": {"field": "firstname"}}
            ]})
        );
    }

    #[test]
    fn test_and_requires_clauses() {
        let empty: Vec<Filter> = Vec::new();
        assert!(matches!(Filter::and(empty), Err(Error::MissingField("filters"))));

        let f = Filter::and([Filter::missing("a").unwrap(), Filter::missing("b").unwrap()]).unwrap();
        assert_eq!(
            to_json(&f),
            json!({"and": [{"missing": {"field": "a"}}, {"missing": {"field": "b"}}]})
        );
    }

    #[test]
    fn test_not_and_bool() {
        let f = Filter::not(Filter::term("user", "kimchy").unwrap());
        assert_eq!(to_json(&f), json!({"not": {"term": {"user": "kimchy"}}}));

        let f = Filter::bool(
            BoolFilter::new()
                .must(Filter::term("tag", "rust").unwrap())
                .must_not(Query::match_all()),
        );
        assert_eq!(
            to_json(&f),
            json!({"bool": {"must": [{"term": {"tag": "rust"}}], "must_not": [{"match_all": {}}]}})
        );
    }

    #[test]
    fn test_query_wraps_clause() {
        let f = Filter::query(Query::match_query("title", "rust", None).unwrap());
        assert_eq!(
            to_json(&f),
            json!({"query": {"match": {"title": {"query": "rust"}}}})
        );
    }

    // ===================================================================
    // Field filters
    // ===================================================================

    #[test]
    fn test_exists_missing() {
        assert_eq!(
            to_json(&Filter::exists("user").unwrap()),
            json!({"exists": {"field": "user"}})
        );
        assert!(matches!(Filter::exists(""), Err(Error::MissingField("field"))));
        assert!(Filter::missing("").is_err());
    }

    #[test]
    fn test_term_and_terms() {
        assert_eq!(
            to_json(&Filter::term("user", "kimchy").unwrap()),
            json!({"term": {"user": "kimchy"}})
        );
        assert_eq!(
            to_json(&Filter::term("tags", json!(["a", "b"])).unwrap()),
            json!({"terms": {"tags": ["a", "b"]}})
        );
        assert!(Filter::term("user", Value::Null).is_err());
        assert!(Filter::term("tags", json!([])).is_err());
    }

    #[test]
    fn test_ids_limit_type() {
        assert_eq!(
            to_json(&Filter::ids(["1", "4"], Some("user")).unwrap()),
            json!({"ids": {"values": ["1", "4"], "type": "user"}})
        );
        assert_eq!(to_json(&Filter::limit(100).unwrap()), json!({"limit": {"value": 100}}));
        assert!(matches!(Filter::limit(0), Err(Error::InvalidValue { .. })));
        assert_eq!(
            to_json(&Filter::doc_type("my_type").unwrap()),
            json!({"type": {"value": "my_type"}})
        );
    }

    #[test]
    fn test_range_filters_emit_only_supplied_bounds() {
        let f = Filter::range("age", RangeBounds::new().from(10).to(20)).unwrap();
        assert_eq!(to_json(&f), json!({"range": {"age": {"from": 10, "to": 20}}}));

        let f = Filter::numeric_range(
            "price",
            RangeBounds::new().from(1.5).include_lower(true).include_upper(false),
        )
        .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"numeric_range": {"price": {"from": 1.5, "include_lower": true, "include_upper": false}}})
        );
    }

    #[test]
    fn test_prefix_and_script() {
        assert_eq!(
            to_json(&Filter::prefix("user", "ki").unwrap()),
            json!({"prefix": {"user": "ki"}})
        );

        let f = Filter::script("doc['num1'].value > 1", None).unwrap();
        assert_eq!(to_json(&f), json!({"script": {"script": "doc['num1'].value > 1"}}));

        let mut params = Map::new();
        params.insert("param1".to_string(), json!(5));
        let f = Filter::script("doc['num1'].value > param1", Some(params)).unwrap();
        assert_eq!(
            to_json(&f),
            json!({"script": {"script": "doc['num1'].value > param1", "params": {"param1": 5}}})
        );
        assert!(Filter::script("", None).is_err());
    }

    #[test]
    fn test_has_child_and_match_all() {
        let f = Filter::has_child("blog_tag", Query::term([("tag", "something")]).unwrap()).unwrap();
        assert_eq!(
            to_json(&f),
            json!({"has_child": {"type": "blog_tag", "query": {"term": {"tag": "something"}}}})
        );
        assert_eq!(to_json(&Filter::match_all()), json!({"match_all": {}}));
    }

    // ===================================================================
    // Geo filters
    // ===================================================================

    #[test]
    fn test_geo_bounding_box() {
        let f = Filter::geo_bounding_box(
            "pin.location",
            GeoPoint::lat_lon(40.73, -74.1),
            GeoPoint::lat_lon(40.717, -73.99),
        )
        .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"geo_bounding_box": {"pin.location": {
                "top_left": {"lat": 40.73, "lon": -74.1},
                "bottom_right": {"lat": 40.717, "lon": -73.99}
            }}})
        );
        assert!(Filter::geo_bounding_box(
            "pin.location",
            GeoPoint::geohash(""),
            GeoPoint::geohash("drm3btev3e86")
        )
        .is_err());
    }

    #[test]
    fn test_geo_distance_type_only_when_supplied() {
        let f = Filter::geo_distance("pin.location", GeoPoint::coordinates(-70.0, 40.0), "300km", None)
            .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"geo_distance": {"distance": "300km", "pin.location": [-70.0, 40.0]}})
        );

        let f = Filter::geo_distance(
            "pin.location",
            GeoPoint::geohash("drm3btev3e86"),
            "12km",
            Some(DistanceType::Plane),
        )
        .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"geo_distance": {
                "distance": "12km",
                "distance_type": "plane",
                "pin.location": "drm3btev3e86"
            }})
        );
        assert!(Filter::geo_distance("pin.location", GeoPoint::lat_lon(0.0, 0.0), "", None).is_err());
    }

    #[test]
    fn test_geo_distance_range() {
        let f = Filter::geo_distance_range(
            "pin.location",
            GeoPoint::lat_lon(40.0, -70.0),
            "200km",
            "400km",
            Some(DistanceType::Arc),
        )
        .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"geo_distance_range": {
                "from": "200km",
                "to": "400km",
                "distance_type": "arc",
                "pin.location": {"lat": 40.0, "lon": -70.0}
            }})
        );
    }

    #[test]
    fn test_geo_distance_rejects_option_names_as_field() {
        let center = GeoPoint::coordinates(-70.0, 40.0);
        for field in ["distance", "distance_type"] {
            let err = Filter::geo_distance(field, center.clone(), "300km", None).unwrap_err();
            assert!(matches!(err, Error::InvalidValue { field: "field", .. }));
        }
        for field in ["from", "to", "distance_type"] {
            let err = Filter::geo_distance_range(field, center.clone(), "1km", "2km", None)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidValue { field: "field", .. }));
        }
        assert!(Filter::geo_distance("from", center, "300km", None).is_ok());
    }

    #[test]
    fn test_geo_polygon() {
        let f = Filter::geo_polygon(
            "pin.location",
            vec![
                GeoPoint::coordinates(-70.0, 40.0),
                GeoPoint::coordinates(-80.0, 30.0),
                GeoPoint::coordinates(-90.0, 20.0),
            ],
        )
        .unwrap();
        assert_eq!(
            to_json(&f),
            json!({"geo_polygon": {"pin.location": {"points": [[-70.0, 40.0], [-80.0, 30.0], [-90.0, 20.0]]}}})
        );
        assert!(matches!(
            Filter::geo_polygon("pin.location", Vec::new()),
            Err(Error::MissingField("points"))
        ));
    }
}
