//! Nearest sources command

use super::{Context, PointArgs};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use streamlyne_cli::output::{self, format_count, format_distance_km};
use streamlyne_cli::Status;
use streamlyne_engine::{LayerKey, LocationFeed, MapRegion, Marker, ProximityResult};

#[derive(Serialize)]
struct NearestReport {
    #[serde(flatten)]
    result: ProximityResult,
    focus: Option<MapRegion>,
}

/// Rank the sources of `layers` nearest to `point`
pub async fn run(
    ctx: &Context,
    point: PointArgs,
    layers: &[LayerKey],
    k: Option<usize>,
) -> Result<()> {
    let feed = LocationFeed::new();
    let session = ctx.session(&feed);
    ctx.show_layers(session.layers(), layers).await;
    feed.publish(point.coordinate()?)?;

    let result = match k {
        Some(k) => session.nearest_sources_k(k)?,
        None => session.nearest_sources()?,
    };
    let focus = session.focus_on_nearest();

    if ctx.json() {
        output::print_json(&NearestReport { result, focus })?;
        return Ok(());
    }

    if result.is_empty() {
        Status::info("No visible sources to search");
        return Ok(());
    }

    Status::header(&format!(
        "Nearest {} to {}",
        format_count(result.len(), "source", "sources"),
        result.reference
    ));
    println!(
        "  {:>2}  {:<28} {:<18} {:>14}",
        "#".dimmed(),
        "Name".dimmed(),
        "Layer".dimmed(),
        "Distance (km)".dimmed()
    );
    for (rank, source) in result.sources.iter().enumerate() {
        let marker = Marker::from(source);
        println!(
            "  {:>2}  {:<28} {:<18} {:>14}",
            rank + 1,
            marker.title,
            source.layer.label(),
            format_distance_km(source.distance_km)
        );
    }

    if let Some(region) = focus {
        println!();
        println!(
            "  {} {} ({}° x {}°)",
            "Focus:".bold(),
            region.center,
            region.latitude_delta,
            region.longitude_delta
        );
    }
    Ok(())
}
