//! Map session: nearest-source search over visible layers, highlighting and markers.

use crate::error::Result;
use crate::layer::{LayerKey, LayerSources, LayerStore, SourceReader};
use crate::location::LocationReader;
use crate::region::MapRegion;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use streamlyne_core::config::Config;
use streamlyne_geo::{nearest, Coordinate, Feature, DEFAULT_K, UNNAMED_FEATURE};
use streamlyne_telemetry::metrics;
use tracing::debug;

/// Title of highlighted sources without a name.
pub const NEARBY_SOURCE_TITLE: &str = "Nearby Source";

/// Default span of a focused region in degrees.
pub const DEFAULT_FOCUS_DELTA: f64 = 0.005;

/// Tunables of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Sources returned by [`MapSession::nearest_sources`]
    pub k: usize,
    /// Span of focused regions in degrees
    pub focus_delta: f64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            focus_delta: DEFAULT_FOCUS_DELTA,
        }
    }
}

impl SessionSettings {
    /// Settings from `[proximity]` and `[map]`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            k: config.schema.proximity.k,
            focus_delta: config.schema.map.focus_delta,
        }
    }
}

/// One ranked source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySource {
    /// Layer it came from
    pub layer: LayerKey,
    /// Position within that layer
    pub index: usize,
    /// The feature
    pub feature: Feature,
    /// Great-circle distance in kilometers
    pub distance_km: f64,
}

/// Closest visible sources to a reference point, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityResult {
    /// Position the distances were measured from
    pub reference: Coordinate,
    /// Ranked sources
    pub sources: Vec<NearbySource>,
}

impl ProximityResult {
    /// The nearest source, if any.
    pub fn closest(&self) -> Option<&NearbySource> {
        self.sources.first()
    }

    /// Region of `delta` degrees centred on the nearest source.
    pub fn focus(&self, delta: f64) -> Option<MapRegion> {
        self.closest()
            .map(|source| MapRegion::around(source.feature.coordinate, delta))
    }

    /// Number of ranked sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when nothing was in range of the search.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// A drawable, tappable point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Owning layer
    pub layer: LayerKey,
    /// Position within that layer
    pub index: usize,
    /// Exact feature position
    pub coordinate: Coordinate,
    /// Callout title
    pub title: String,
    /// Feature properties passed on to follow-up screens
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    /// Drawn as a nearest-source highlight
    pub highlighted: bool,
}

impl Marker {
    /// Marker for `feature`, titled with its name or `fallback`.
    pub fn for_feature(layer: LayerKey, index: usize, feature: &Feature, fallback: &str) -> Self {
        Self {
            layer,
            index,
            coordinate: feature.coordinate,
            title: feature.label_or(fallback).to_string(),
            properties: feature.properties.clone(),
            highlighted: false,
        }
    }
}

impl From<&NearbySource> for Marker {
    fn from(source: &NearbySource) -> Self {
        Self {
            highlighted: true,
            ..Marker::for_feature(source.layer, source.index, &source.feature, NEARBY_SOURCE_TITLE)
        }
    }
}

/// State behind one map screen.
pub struct MapSession<R> {
    layers: Arc<LayerStore<R>>,
    location: LocationReader,
    settings: SessionSettings,
    highlighted: Mutex<Option<ProximityResult>>,
}

impl<R: SourceReader> MapSession<R> {
    /// Session over an existing layer store.
    pub fn new(
        layers: Arc<LayerStore<R>>,
        location: LocationReader,
        settings: SessionSettings,
    ) -> Self {
        Self {
            layers,
            location,
            settings,
            highlighted: Mutex::new(None),
        }
    }

    /// Session with layer sources and settings taken from `config`.
    pub fn from_config(reader: R, config: &Config, location: LocationReader) -> Self {
        let layers = LayerStore::new(reader, LayerSources::from_config(config));
        Self::new(Arc::new(layers), location, SessionSettings::from_config(config))
    }

    fn highlight(&self) -> MutexGuard<'_, Option<ProximityResult>> {
        self.highlighted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The layer store.
    pub fn layers(&self) -> &Arc<LayerStore<R>> {
        &self.layers
    }

    /// The reference point reader.
    pub fn location(&self) -> &LocationReader {
        &self.location
    }

    /// Session tunables.
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Nearest sources using the configured `k`.
    pub fn nearest_sources(&self) -> Result<ProximityResult> {
        self.nearest_sources_k(self.settings.k)
    }

    /// The `k` visible sources nearest the current location, which become the highlight.
    ///
    /// # Errors
    /// [`crate::EngineError::LocationUnavailable`] when there is no fix; the
    /// previous highlight is kept.
    pub fn nearest_sources_k(&self, k: usize) -> Result<ProximityResult> {
        let reference = self.location.coordinate()?;
        metrics().increment("proximity_queries");

        let visible = self.layers.visible_features();
        let candidates: Vec<_> = visible.iter().collect();
        let sources: Vec<NearbySource> = nearest(&reference, &candidates, k)
            .into_iter()
            .map(|ranked| NearbySource {
                layer: ranked.item.layer,
                index: ranked.item.index,
                feature: ranked.item.feature.clone(),
                distance_km: ranked.distance_km,
            })
            .collect();

        debug!(
            reference = %reference,
            candidates = candidates.len(),
            returned = sources.len(),
            "Nearest sources computed"
        );

        let result = ProximityResult { reference, sources };
        *self.highlight() = Some(result.clone());
        Ok(result)
    }

    /// The last successful proximity result.
    pub fn highlighted(&self) -> Option<ProximityResult> {
        self.highlight().clone()
    }

    /// Drop the highlight.
    pub fn clear_highlight(&self) {
        *self.highlight() = None;
    }

    /// Markers of every visible layer, then the highlighted sources.
    pub fn markers(&self) -> Vec<Marker> {
        let visible = self.layers.visible_features();
        let mut markers: Vec<Marker> = visible
            .iter()
            .map(|t| Marker::for_feature(t.layer, t.index, t.feature, UNNAMED_FEATURE))
            .collect();

        if let Some(result) = self.highlight().as_ref() {
            markers.extend(result.sources.iter().map(Marker::from));
        }
        markers
    }

    /// Region centred on the current location.
    ///
    /// # Errors
    /// [`crate::EngineError::LocationUnavailable`] when there is no fix.
    pub fn focus_on_location(&self) -> Result<MapRegion> {
        let center = self.location.coordinate()?;
        Ok(MapRegion::around(center, self.settings.focus_delta))
    }

    /// Region centred on the nearest highlighted source.
    pub fn focus_on_nearest(&self) -> Option<MapRegion> {
        self.highlight()
            .as_ref()
            .and_then(|result| result.focus(self.settings.focus_delta))
    }
}
