//! Layer store
//!
//! Each [`LayerKey`] owns a visibility flag and a lazily loaded feature list.
//! Showing a layer for the first time starts exactly one load of its backing
//! source; toggling it again while that load is in flight never starts a
//! second one. Loads finish independently of visibility, so a layer hidden
//! mid-load keeps its data for the next time it is shown.
//!
//! A failed load leaves the layer visible with [`LayerStatus::Errored`] and is
//! retried the next time the layer is shown.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use streamlyne_core::config::Config;
use streamlyne_geo::{parse_feature_collection, Coordinate, Feature, Located};
use streamlyne_telemetry::{metrics, Timer};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The closed set of layers shown on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKey {
    /// Groundwater borewells
    Borewells,
    /// Pumping stations
    PumpingStations,
    /// Network valves
    Valves,
}

impl LayerKey {
    /// Every layer, in display order.
    pub const ALL: [LayerKey; 3] = [
        LayerKey::Borewells,
        LayerKey::PumpingStations,
        LayerKey::Valves,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            LayerKey::Borewells => "Borewells",
            LayerKey::PumpingStations => "Pumping Stations",
            LayerKey::Valves => "Valves",
        }
    }

    /// Stable identifier shared with the UI.
    pub fn wire_name(self) -> &'static str {
        match self {
            LayerKey::Borewells => "borewells",
            LayerKey::PumpingStations => "pumpingStations",
            LayerKey::Valves => "valves",
        }
    }

    /// Key used in the `[layers]` configuration table.
    pub fn config_name(self) -> &'static str {
        match self {
            LayerKey::Borewells => "borewells",
            LayerKey::PumpingStations => "pumping_stations",
            LayerKey::Valves => "valves",
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for LayerKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        LayerKey::ALL
            .into_iter()
            .find(|key| key.wire_name().eq_ignore_ascii_case(s) || key.config_name() == s)
            .ok_or_else(|| EngineError::UnknownLayer(s.to_string()))
    }
}

/// Backing source path of every layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSources {
    paths: [PathBuf; 3],
}

impl LayerSources {
    /// Sources in [`LayerKey::ALL`] order.
    pub fn new(
        borewells: impl Into<PathBuf>,
        pumping_stations: impl Into<PathBuf>,
        valves: impl Into<PathBuf>,
    ) -> Self {
        Self {
            paths: [borewells.into(), pumping_stations.into(), valves.into()],
        }
    }

    /// Sources from `[layers]`, resolved against the config file's directory.
    pub fn from_config(config: &Config) -> Self {
        let layers = &config.schema.layers;
        Self::new(
            config.resolve(&layers.borewells),
            config.resolve(&layers.pumping_stations),
            config.resolve(&layers.valves),
        )
    }

    /// Path backing `key`.
    pub fn path(&self, key: LayerKey) -> &Path {
        &self.paths[key.index()]
    }
}

/// Reads the raw text of a geographic source.
pub trait SourceReader: Send + Sync {
    /// Read the whole source at `path`.
    fn read(&self, path: &Path) -> impl Future<Output = std::io::Result<String>> + Send;
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    async fn read(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// Read and parse one feature collection.
///
/// # Errors
/// [`EngineError::SourceUnreadable`] if the reader fails and
/// [`EngineError::Geo`] if the contents are malformed.
pub async fn load_source<R: SourceReader>(reader: &R, path: &Path) -> Result<Vec<Feature>> {
    let text = reader
        .read(path)
        .await
        .map_err(|source| EngineError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_feature_collection(&text)?)
}

#[derive(Debug, Clone, Default)]
enum LoadState {
    #[default]
    Empty,
    Loading,
    Loaded(Arc<[Feature]>),
    Failed(String),
}

#[derive(Debug, Default)]
struct Slot {
    visible: bool,
    load: LoadState,
}

/// What a layer currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayerStatus {
    /// Not visible
    Hidden,
    /// Visible, source still loading
    Loading,
    /// Visible with data
    Ready {
        /// Number of loaded features
        features: usize,
    },
    /// Visible, but the last load failed
    Errored {
        /// Load failure reason
        message: String,
    },
}

impl fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerStatus::Hidden => f.write_str("hidden"),
            LayerStatus::Loading => f.write_str("loading"),
            LayerStatus::Ready { features } => write!(f, "{features} features"),
            LayerStatus::Errored { message } => write!(f, "error: {message}"),
        }
    }
}

/// Serializable view of one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSnapshot {
    /// Layer identity
    pub key: LayerKey,
    /// Display label
    pub label: &'static str,
    /// Visibility flag
    pub visible: bool,
    /// Loaded feature count, kept while hidden
    pub loaded: Option<usize>,
    /// Current status
    pub status: LayerStatus,
}

/// A feature from a visible layer, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedFeature<'a> {
    /// Owning layer
    pub layer: LayerKey,
    /// Position within the layer's source
    pub index: usize,
    /// The feature itself
    pub feature: &'a Feature,
}

impl Located for TaggedFeature<'_> {
    fn coordinate(&self) -> Coordinate {
        self.feature.coordinate
    }
}

/// Features of every visible, loaded layer, captured at one instant.
#[derive(Debug, Clone, Default)]
pub struct VisibleFeatures {
    layers: Vec<(LayerKey, Arc<[Feature]>)>,
}

impl VisibleFeatures {
    /// All features, layer by layer in [`LayerKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = TaggedFeature<'_>> {
        self.layers.iter().flat_map(|(layer, features)| {
            features.iter().enumerate().map(|(index, feature)| TaggedFeature {
                layer: *layer,
                index,
                feature,
            })
        })
    }

    /// Total number of features.
    pub fn len(&self) -> usize {
        self.layers.iter().map(|(_, f)| f.len()).sum()
    }

    /// True when no visible layer has data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-layer visibility and lazily loaded data.
pub struct LayerStore<R> {
    reader: R,
    sources: LayerSources,
    slots: Mutex<[Slot; 3]>,
    revision: watch::Sender<u64>,
}

impl<R: SourceReader> LayerStore<R> {
    /// Create a store with every layer hidden and empty.
    pub fn new(reader: R, sources: LayerSources) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            reader,
            sources,
            slots: Mutex::new(Default::default()),
            revision,
        }
    }

    fn slots(&self) -> MutexGuard<'_, [Slot; 3]> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Observe changes; the value increments on every visibility or load change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Flip visibility of `key`, loading its source if it is shown without data.
    ///
    /// Resolves once any load started by this call has finished, and returns the
    /// layer's status at that point.
    pub async fn toggle(&self, key: LayerKey) -> LayerStatus {
        let start_load = {
            let mut slots = self.slots();
            let slot = &mut slots[key.index()];
            slot.visible = !slot.visible;
            let start =
                slot.visible && matches!(slot.load, LoadState::Empty | LoadState::Failed(_));
            if start {
                slot.load = LoadState::Loading;
            }
            debug!(layer = %key, visible = slot.visible, load = start, "Layer toggled");
            start
        };
        self.bump();

        if start_load {
            self.load(key).await;
        }
        self.status(key)
    }

    /// Show or hide `key`; does nothing when it already has that visibility.
    ///
    /// A shown layer whose load was abandoned before finishing is loaded again.
    pub async fn set_visible(&self, key: LayerKey, visible: bool) -> LayerStatus {
        if self.is_visible(key) != visible {
            return self.toggle(key).await;
        }
        if visible && self.resume_load(key) {
            self.load(key).await;
        }
        self.status(key)
    }

    /// Claim a load for a shown layer left without data or a load in flight.
    fn resume_load(&self, key: LayerKey) -> bool {
        let resume = {
            let mut slots = self.slots();
            let slot = &mut slots[key.index()];
            let resume = slot.visible && matches!(slot.load, LoadState::Empty);
            if resume {
                slot.load = LoadState::Loading;
                debug!(layer = %key, "Resuming abandoned layer load");
            }
            resume
        };
        if resume {
            self.bump();
        }
        resume
    }

    async fn load(&self, key: LayerKey) {
        let path = self.sources.path(key);
        let mut pending = PendingLoad {
            store: self,
            key,
            done: false,
        };

        metrics().increment("layer_loads");
        let timer = Timer::start("layer_load_ms");
        let outcome = load_source(&self.reader, path).await;
        timer.stop();

        let state = match outcome {
            Ok(features) => {
                info!(
                    layer = %key,
                    features = features.len(),
                    path = %path.display(),
                    "Layer loaded"
                );
                LoadState::Loaded(features.into())
            }
            Err(err) => {
                metrics().increment("layer_load_failures");
                warn!(layer = %key, path = %path.display(), error = %err, "Layer load failed");
                LoadState::Failed(err.to_string())
            }
        };
        pending.finish(state);
    }

    /// Whether `key` is currently shown.
    pub fn is_visible(&self, key: LayerKey) -> bool {
        self.slots()[key.index()].visible
    }

    /// Current status of `key`.
    pub fn status(&self, key: LayerKey) -> LayerStatus {
        let slots = self.slots();
        status_of(&slots[key.index()])
    }

    /// Loaded features of `key`, whether or not it is visible.
    pub fn features(&self, key: LayerKey) -> Option<Arc<[Feature]>> {
        match &self.slots()[key.index()].load {
            LoadState::Loaded(features) => Some(Arc::clone(features)),
            _ => None,
        }
    }

    /// Features of every visible layer that has data.
    pub fn visible_features(&self) -> VisibleFeatures {
        let slots = self.slots();
        let layers = LayerKey::ALL
            .into_iter()
            .filter_map(|key| {
                let slot = &slots[key.index()];
                match &slot.load {
                    LoadState::Loaded(features) if slot.visible => {
                        Some((key, Arc::clone(features)))
                    }
                    _ => None,
                }
            })
            .collect();
        VisibleFeatures { layers }
    }

    /// Every layer's state.
    pub fn snapshot(&self) -> Vec<LayerSnapshot> {
        let slots = self.slots();
        LayerKey::ALL
            .into_iter()
            .map(|key| {
                let slot = &slots[key.index()];
                LayerSnapshot {
                    key,
                    label: key.label(),
                    visible: slot.visible,
                    loaded: match &slot.load {
                        LoadState::Loaded(features) => Some(features.len()),
                        _ => None,
                    },
                    status: status_of(slot),
                }
            })
            .collect()
    }
}

fn status_of(slot: &Slot) -> LayerStatus {
    if !slot.visible {
        return LayerStatus::Hidden;
    }
    match &slot.load {
        LoadState::Empty | LoadState::Loading => LayerStatus::Loading,
        LoadState::Loaded(features) => LayerStatus::Ready {
            features: features.len(),
        },
        LoadState::Failed(message) => LayerStatus::Errored {
            message: message.clone(),
        },
    }
}

/// Marks a load in flight; resets the slot to empty if the load future is dropped early.
struct PendingLoad<'a, R: SourceReader> {
    store: &'a LayerStore<R>,
    key: LayerKey,
    done: bool,
}

impl<R: SourceReader> PendingLoad<'_, R> {
    fn finish(&mut self, state: LoadState) {
        self.store.slots()[self.key.index()].load = state;
        self.done = true;
        self.store.bump();
    }
}

impl<R: SourceReader> Drop for PendingLoad<'_, R> {
    fn drop(&mut self) {
        if !self.done {
            let mut slots = self.store.slots();
            let slot = &mut slots[self.key.index()];
            if matches!(slot.load, LoadState::Loading) {
                slot.load = LoadState::Empty;
            }
        }
    }
}
