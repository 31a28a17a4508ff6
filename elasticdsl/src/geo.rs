//! Geo point representations accepted by geo filters and geo-distance sorting

use serde::{Deserialize, Serialize};

/// A geo point in any of the engine's accepted encodings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GeoPoint {
    /// `{"lat": .., "lon": ..}`
    LatLon { lat: f64, lon: f64 },
    /// `[lon, lat]`, GeoJSON order
    Coordinates([f64; 2]),
    /// A geohash or a `"lat, lon"` string
    Text(String),
}

impl GeoPoint {
    pub fn lat_lon(lat: f64, lon: f64) -> Self {
        Self::LatLon { lat, lon }
    }

    /// Array form; note the engine reads arrays as `[lon, lat]`.
    pub fn coordinates(lon: f64, lat: f64) -> Self {
        Self::Coordinates([lon, lat])
    }

    pub fn geohash(hash: impl Into<String>) -> Self {
        Self::Text(hash.into())
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

/// How distances are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceType {
    /// Better precision
    Arc,
    /// Faster
    Plane,
}
