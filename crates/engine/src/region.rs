//! Map viewport regions.

use serde::Serialize;
use streamlyne_geo::Coordinate;

/// Visible map area: a centre plus its latitude and longitude span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapRegion {
    /// Centre of the viewport
    pub center: Coordinate,
    /// North-south span in degrees
    pub latitude_delta: f64,
    /// East-west span in degrees
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Square region of `delta` degrees centred on `center`.
    pub fn around(center: Coordinate, delta: f64) -> Self {
        Self {
            center,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }

    /// Whether `point` falls inside the region.
    pub fn contains(&self, point: &Coordinate) -> bool {
        (point.latitude - self.center.latitude).abs() <= self.latitude_delta / 2.0
            && (point.longitude - self.center.longitude).abs() <= self.longitude_delta / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_and_contains() {
        let region = MapRegion::around(Coordinate::new(12.9716, 77.5946), 0.005);
        assert_eq!(region.latitude_delta, 0.005);
        assert!(region.contains(&Coordinate::new(12.9720, 77.5950)));
        assert!(!region.contains(&Coordinate::new(12.9800, 77.5946)));
    }
}
