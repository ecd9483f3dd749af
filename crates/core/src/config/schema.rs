//! Configuration schema definitions

use crate::validation::{ValidationResult, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest `k` a proximity query may ask for
pub const MAX_PROXIMITY_K: usize = 100;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Backing source file for each layer
    #[serde(default)]
    pub layers: LayersConfig,

    /// Nearest-source search settings
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// Map viewport settings
    #[serde(default)]
    pub map: MapConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> ValidationResult {
        let mut result = Validator::new()
            .range("proximity.k", self.proximity.k, 1, MAX_PROXIMITY_K)
            .range("map.focus_delta", self.map.focus_delta, f64::MIN_POSITIVE, 90.0)
            .custom("logging.level", || {
                let level = self.logging.level.to_ascii_lowercase();
                (!LOG_LEVELS.contains(&level.as_str()))
                    .then(|| format!("Unknown log level '{}'", self.logging.level))
            })
            .validate();

        for (name, path) in self.layers.entries() {
            result.merge(
                Validator::new()
                    .required(&format!("layers.{name}"), &path.to_string_lossy())
                    .validate(),
            );
        }
        result
    }
}

/// Source file per layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayersConfig {
    /// Borewell point source
    #[serde(default = "default_borewells")]
    pub borewells: PathBuf,

    /// Pumping station point source
    #[serde(default = "default_pumping_stations")]
    pub pumping_stations: PathBuf,

    /// Valve point source
    #[serde(default = "default_valves")]
    pub valves: PathBuf,
}

impl LayersConfig {
    /// Config name and path of every layer, in declaration order
    pub fn entries(&self) -> [(&'static str, &PathBuf); 3] {
        [
            ("borewells", &self.borewells),
            ("pumping_stations", &self.pumping_stations),
            ("valves", &self.valves),
        ]
    }
}

impl Default for LayersConfig {
    fn default() -> Self {
        Self {
            borewells: default_borewells(),
            pumping_stations: default_pumping_stations(),
            valves: default_valves(),
        }
    }
}

fn default_borewells() -> PathBuf {
    PathBuf::from("assets/bangalore_borewells.geojson")
}

fn default_pumping_stations() -> PathBuf {
    PathBuf::from("assets/pumping-stations.geojson")
}

fn default_valves() -> PathBuf {
    PathBuf::from("assets/bangalore_valves.geojson")
}

/// Nearest-source search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Number of sources returned by a query
    #[serde(default = "default_k")]
    pub k: usize,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

fn default_k() -> usize {
    5
}

/// Map viewport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Latitude and longitude span, in degrees, of a focused region
    #[serde(default = "default_focus_delta")]
    pub focus_delta: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            focus_delta: default_focus_delta(),
        }
    }
}

fn default_focus_delta() -> f64 {
    0.005
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of the compact format
    #[serde(default)]
    pub json: bool,

    /// Directory for a daily-rotated log file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
