//! Geospatial primitives for the StreamLyne field map.
//!
//! This crate provides:
//! - A WGS-84 [`Coordinate`] type
//! - Haversine great-circle distance on a spherical Earth
//! - Parsing of GeoJSON point feature collections into [`Feature`]s
//! - Top-K nearest-feature ranking with optional parallelism
//!
//! # Example
//!
//! ```
//! use streamlyne_geo::{haversine_distance, Coordinate};
//!
//! let bengaluru = Coordinate::new(12.9716, 77.5946);
//! let mysuru = Coordinate::new(12.2958, 76.6394);
//!
//! let distance_km = haversine_distance(&bengaluru, &mysuru);
//! assert!((distance_km - 128.0).abs() < 5.0);
//! ```

mod error;
mod haversine;
pub mod proximity;
pub mod source;

pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{haversine_distance, EARTH_RADIUS_KM};
pub use proximity::{nearest, Located, Ranked, DEFAULT_K};
pub use source::{parse_feature_collection, Feature, UNNAMED_FEATURE};

/// A geographic coordinate with latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without validation.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) is outside WGS-84 bounds"
            )))
        }
    }

    /// Builds a coordinate from a GeoJSON `[longitude, latitude]` position.
    #[inline]
    pub fn from_lon_lat([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }

    /// Returns true if both components are finite and within WGS-84 bounds.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(12.9716, 77.5946);
        assert_eq!(coord.latitude, 12.9716);
        assert_eq!(coord.longitude, 77.5946);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_bounds() {
        assert!(Coordinate::try_new(12.9716, 77.5946).is_ok());
        let err = Coordinate::try_new(120.0, 77.5946).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_from_lon_lat_swaps_axes() {
        let coord = Coordinate::from_lon_lat([77.5946, 12.9716]);
        assert_eq!(coord.latitude, 12.9716);
        assert_eq!(coord.longitude, 77.5946);
    }

    #[test]
    fn test_display_is_directions_destination() {
        let coord = Coordinate::new(12.9716, 77.5946);
        assert_eq!(coord.to_string(), "12.9716,77.5946");
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (12.9716, 77.5946).into();
        assert_eq!(coord.latitude, 12.9716);
    }
}
