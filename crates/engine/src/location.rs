//! Current reference point.
//!
//! One [`LocationFeed`] owns the writer side; any number of
//! [`LocationReader`]s observe it. Readers always see the latest published
//! value at the moment they ask, never a copy captured earlier.

use crate::error::{EngineError, Result, Unavailable};
use serde::Serialize;
use streamlyne_geo::Coordinate;
use tokio::sync::watch;
use tracing::debug;

/// What the location collaborator has reported so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    /// No fix has arrived yet
    Pending,
    /// The user refused location access
    PermissionDenied,
    /// Latest known position
    Fix(Coordinate),
}

impl LocationState {
    /// The fix, or why there is none.
    pub fn coordinate(&self) -> Result<Coordinate> {
        match self {
            LocationState::Fix(coordinate) => Ok(*coordinate),
            LocationState::Pending => Err(EngineError::LocationUnavailable(Unavailable::Pending)),
            LocationState::PermissionDenied => {
                Err(EngineError::LocationUnavailable(Unavailable::PermissionDenied))
            }
        }
    }
}

/// Single writer of the reference point.
#[derive(Debug)]
pub struct LocationFeed {
    tx: watch::Sender<LocationState>,
}

impl Default for LocationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationFeed {
    /// Start with no fix.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LocationState::Pending);
        Self { tx }
    }

    /// Publish a new fix.
    ///
    /// # Errors
    /// Rejects non-finite or out-of-range coordinates and keeps the previous state.
    pub fn publish(&self, coordinate: Coordinate) -> Result<()> {
        let coordinate = Coordinate::try_new(coordinate.latitude, coordinate.longitude)?;
        debug!(%coordinate, "Location fix");
        self.tx.send_replace(LocationState::Fix(coordinate));
        Ok(())
    }

    /// Record that location access was refused.
    pub fn deny(&self) {
        debug!("Location permission denied");
        self.tx.send_replace(LocationState::PermissionDenied);
    }

    /// Latest state.
    pub fn current(&self) -> LocationState {
        *self.tx.borrow()
    }

    /// A new reader of this feed.
    pub fn reader(&self) -> LocationReader {
        LocationReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the reference point.
#[derive(Debug, Clone)]
pub struct LocationReader {
    rx: watch::Receiver<LocationState>,
}

impl LocationReader {
    /// Latest state at call time.
    pub fn current(&self) -> LocationState {
        *self.rx.borrow()
    }

    /// Latest fix, or [`EngineError::LocationUnavailable`].
    pub fn coordinate(&self) -> Result<Coordinate> {
        self.current().coordinate()
    }

    /// Wait for the next published state.
    ///
    /// Returns `None` once the feed is gone.
    pub async fn changed(&mut self) -> Option<LocationState> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
