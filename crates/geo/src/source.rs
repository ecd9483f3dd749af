//! GeoJSON point source parsing.
//!
//! A source is a feature collection: an object with a `features` array whose
//! elements carry `geometry.coordinates` as `[longitude, latitude]` and an
//! optional `properties` object:
//!
//! ```json
//! {"type": "FeatureCollection", "features": [
//!   {"type": "Feature",
//!    "geometry": {"type": "Point", "coordinates": [77.5946, 12.9716]},
//!    "properties": {"name": "Cubbon Park borewell"}}
//! ]}
//! ```
//!
//! Parsing is all-or-nothing: one bad feature rejects the whole source, so a
//! layer is never partially populated.

use crate::{Coordinate, GeoError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Display label for features without a `properties.name`.
pub const UNNAMED_FEATURE: &str = "Unknown";

/// A single point of interest read from a source.
///
/// Coordinates are stored exactly as decoded; downstream lookups match on
/// exact latitude/longitude equality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Position of the feature
    pub coordinate: Coordinate,
    /// Free-form properties copied from the source
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Creates a feature with no properties.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            properties: Map::new(),
        }
    }

    /// Builder-style method to set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.properties
            .insert("name".to_string(), Value::String(name.into()));
        self
    }

    /// The feature's `properties.name`, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }

    /// The feature's name, or `fallback` when it has none.
    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name().unwrap_or(fallback)
    }

    /// The feature's name, or [`UNNAMED_FEATURE`].
    pub fn label(&self) -> &str {
        self.label_or(UNNAMED_FEATURE)
    }
}

/// Parse a feature collection from source text.
///
/// # Errors
/// Returns [`GeoError::MalformedSource`] when the text is not JSON, has no
/// `features` array, or any feature lacks a valid `[longitude, latitude]`.
///
/// # Example
/// ```
/// use streamlyne_geo::parse_feature_collection;
///
/// let text = r#"{"features": [
///     {"geometry": {"coordinates": [77.5946, 12.9716]}, "properties": {"name": "Valve 7"}},
///     {"geometry": {"coordinates": [77.6000, 12.9800]}}
/// ]}"#;
///
/// let features = parse_feature_collection(text).unwrap();
/// assert_eq!(features.len(), 2);
/// assert_eq!(features[0].label(), "Valve 7");
/// assert_eq!(features[1].label(), "Unknown");
/// ```
pub fn parse_feature_collection(text: &str) -> Result<Vec<Feature>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| GeoError::malformed(format!("not valid JSON: {e}")))?;
    features_from_value(&value)
}

/// Parse a feature collection from an already-decoded JSON value.
pub fn features_from_value(value: &Value) -> Result<Vec<Feature>> {
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| GeoError::malformed("missing `features` array"))?;

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| parse_feature(index, feature))
        .collect()
}

fn parse_feature(index: usize, value: &Value) -> Result<Feature> {
    let coords = value
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GeoError::malformed(format!("feature {index}: missing geometry.coordinates"))
        })?;

    let position = match coords.as_slice() {
        [lng, lat] => lng.as_f64().zip(lat.as_f64()),
        _ => None,
    }
    .ok_or_else(|| {
        GeoError::malformed(format!(
            "feature {index}: coordinates must be [longitude, latitude]"
        ))
    })?;

    let coordinate = Coordinate::from_lon_lat([position.0, position.1]);
    if !coordinate.is_valid() {
        return Err(GeoError::malformed(format!(
            "feature {index}: coordinate {coordinate} is outside WGS-84 bounds"
        )));
    }

    let properties = value
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(Feature {
        coordinate,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoErrorCode;
    use proptest::prelude::*;
    use serde_json::json;

    fn collection(points: &[(f64, f64)]) -> String {
        let features: Vec<Value> = points
            .iter()
            .map(|(lat, lng)| {
                json!({
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [lng, lat]},
                    "properties": {}
                })
            })
            .collect();
        json!({"type": "FeatureCollection", "features": features}).to_string()
    }

    #[test]
    fn test_parse_named_and_unnamed() {
        let text = json!({
            "features": [
                {"geometry": {"coordinates": [77.5946, 12.9716]}, "properties": {"name": "BW-1"}},
                {"geometry": {"coordinates": [77.6101, 12.9352]}, "properties": null},
                {"geometry": {"coordinates": [77.5800, 12.9600]}}
            ]
        })
        .to_string();

        let features = parse_feature_collection(&text).unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].label(), "BW-1");
        assert_eq!(features[1].name(), None);
        assert_eq!(features[2].label(), UNNAMED_FEATURE);
        assert_eq!(features[0].coordinate, Coordinate::new(12.9716, 77.5946));
    }

    #[test]
    fn test_non_string_name_falls_back() {
        let text = r#"{"features": [
            {"geometry": {"coordinates": [1.0, 2.0]}, "properties": {"name": 42}}
        ]}"#;
        let features = parse_feature_collection(text).unwrap();
        assert_eq!(features[0].label_or("Nearby Source"), "Nearby Source");
    }

    #[test]
    fn test_empty_collection() {
        let features = parse_feature_collection(r#"{"features": []}"#).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_not_json() {
        let err = parse_feature_collection("borewell,77.59,12.97").unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::MalformedSource);
    }

    #[test]
    fn test_missing_features_array() {
        let err = parse_feature_collection(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(err.to_string().contains("features"));

        let err = parse_feature_collection(r#"{"features": {"0": {}}}"#).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::MalformedSource);
    }

    #[test]
    fn test_non_numeric_coordinates_reject_whole_source() {
        let text = json!({
            "features": [
                {"geometry": {"coordinates": [77.5946, 12.9716]}},
                {"geometry": {"coordinates": ["77.6", "12.9"]}}
            ]
        })
        .to_string();

        let err = parse_feature_collection(&text).unwrap_err();
        assert!(err.to_string().contains("feature 1"));
    }

    #[test]
    fn test_wrong_arity_is_malformed() {
        let text = r#"{"features": [{"geometry": {"coordinates": [77.5946]}}]}"#;
        assert!(parse_feature_collection(text).is_err());

        let text = r#"{"features": [{"geometry": {"coordinates": [77.5946, 12.9716, 900.0]}}]}"#;
        assert!(parse_feature_collection(text).is_err());
    }

    #[test]
    fn test_out_of_bounds_is_malformed() {
        // Latitude/longitude swapped in a source far from the equator.
        let text = r#"{"features": [{"geometry": {"coordinates": [12.9716, 97.5946]}}]}"#;
        assert!(parse_feature_collection(text).is_err());
    }

    proptest! {
        #[test]
        fn prop_load_preserves_length_and_order(
            points in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..64)
        ) {
            let features = parse_feature_collection(&collection(&points)).unwrap();
            prop_assert_eq!(features.len(), points.len());
            for (feature, (lat, lng)) in features.iter().zip(points.iter()) {
                prop_assert_eq!(feature.coordinate.latitude, *lat);
                prop_assert_eq!(feature.coordinate.longitude, *lng);
            }
        }
    }
}
