//! CLI command implementations

pub mod annotate;
pub mod layers;
pub mod navigate;
pub mod nearest;
pub mod reviews;

use anyhow::{anyhow, Result};
use clap::Args;
use std::sync::Arc;
use streamlyne_cli::{progress, OutputFormat, Status};
use streamlyne_core::config::Config;
use streamlyne_engine::{
    FsSourceReader, LayerKey, LayerStatus, LayerStore, LocationFeed, MapSession, Marker,
    MenuChoice, SelectionController,
};
use streamlyne_geo::Coordinate;
use tokio::task::JoinSet;

/// A point given on the command line
#[derive(Args, Debug, Clone, Copy)]
pub struct PointArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl PointArgs {
    /// The point, rejected when outside WGS-84 bounds
    pub fn coordinate(self) -> Result<Coordinate> {
        Ok(Coordinate::try_new(self.lat, self.lon)?)
    }
}

/// Everything a command needs besides its own arguments
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: Config, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn json(&self) -> bool {
        self.format.is_json()
    }

    /// A map session over the configured layer files
    pub fn session(&self, feed: &LocationFeed) -> MapSession<FsSourceReader> {
        MapSession::from_config(FsSourceReader, &self.config, feed.reader())
    }

    /// Switch `keys` on, or every layer when empty, and wait for their loads
    ///
    /// A layer that fails to load is reported and left out of the search.
    pub async fn show_layers(&self, store: &Arc<LayerStore<FsSourceReader>>, keys: &[LayerKey]) {
        let keys = if keys.is_empty() { &LayerKey::ALL[..] } else { keys };
        let pb = progress::spinner_unless(self.json(), "Loading layers...");

        let mut loads = JoinSet::new();
        for &key in keys {
            let store = Arc::clone(store);
            loads.spawn(async move { (key, store.set_visible(key, true).await) });
        }

        let mut failed = 0;
        while let Some(joined) = loads.join_next().await {
            match joined {
                Ok((key, LayerStatus::Errored { message })) => {
                    failed += 1;
                    pb.suspend(|| Status::warning(&format!("{}: {message}", key.label())));
                }
                Ok(_) => {}
                Err(e) => {
                    failed += 1;
                    tracing::error!(error = %e, "Layer load task failed");
                }
            }
        }

        if failed == 0 {
            progress::finish_success(&pb, "Layers loaded");
        } else {
            progress::finish_error(&pb, "Some layers failed to load");
        }
    }
}

/// Select the visible source nearest to `point` and open its action menu
///
/// This is the command-line stand-in for tapping a marker.
pub async fn select_nearest(
    ctx: &Context,
    point: PointArgs,
) -> Result<(SelectionController, Marker)> {
    let feed = LocationFeed::new();
    let session = ctx.session(&feed);
    ctx.show_layers(session.layers(), &[]).await;
    feed.publish(point.coordinate()?)?;

    let result = session.nearest_sources_k(1)?;
    let marker = result
        .closest()
        .map(Marker::from)
        .ok_or_else(|| anyhow!("No visible source near {},{}", point.lat, point.lon))?;

    let mut controller = SelectionController::new();
    controller.tap(marker.clone())?;
    controller.open_menu()?;
    Ok((controller, marker))
}

/// Open the menu on the nearest source and pick `choice`
pub async fn choose_on_nearest(
    ctx: &Context,
    point: PointArgs,
    choice: MenuChoice,
) -> Result<(SelectionController, Marker)> {
    let (mut controller, marker) = select_nearest(ctx, point).await?;
    controller.choose(choice)?;
    Ok((controller, marker))
}
