//! Layer store, nearest-source search and marker selection for the
//! Streamlyne field map.
//!
//! - [`LayerStore`]: per-layer visibility with lazy, deduplicated source loads
//! - [`LocationFeed`]: the current reference point, or why there is none
//! - [`MapSession`]: nearest visible sources, highlights, markers, viewport focus
//! - [`SelectionController`]: marker selection and follow-up actions
//!
//! # Example
//!
//! ```no_run
//! use streamlyne_engine::{FsSourceReader, LayerKey, LocationFeed, MapSession};
//! use streamlyne_core::config::Config;
//! use streamlyne_geo::Coordinate;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let feed = LocationFeed::new();
//! let session = MapSession::from_config(FsSourceReader, &config, feed.reader());
//!
//! session.layers().toggle(LayerKey::Borewells).await;
//! feed.publish(Coordinate::new(12.9716, 77.5946))?;
//!
//! for source in session.nearest_sources()?.sources {
//!     println!("{} {:.3} km", source.feature.label(), source.distance_km);
//! }
//! # Ok(())
//! # }
//! ```

mod annotation;
mod error;
pub mod layer;
mod location;
mod region;
pub mod selection;
pub mod session;

pub use annotation::{AnnotationSink, AuthSession, OutbreakRecord, ReviewRecord};
pub use error::{EngineError, EngineErrorCode, Result, SubmissionError, Unavailable};
pub use layer::{
    load_source, FsSourceReader, LayerKey, LayerSnapshot, LayerSources, LayerStatus, LayerStore,
    SourceReader,
};
pub use location::{LocationFeed, LocationReader, LocationState};
pub use region::MapRegion;
pub use selection::{Handoff, MenuChoice, SelectionController, SelectionState};
pub use session::{MapSession, Marker, NearbySource, ProximityResult, SessionSettings};
