//! Layer status command

use super::Context;
use anyhow::Result;
use streamlyne_cli::output::{self, colored_status};
use streamlyne_cli::Status;
use streamlyne_engine::{LayerKey, LocationFeed};

/// Switch on `show` and report every layer
pub async fn run(ctx: &Context, show: &[LayerKey]) -> Result<()> {
    let feed = LocationFeed::new();
    let session = ctx.session(&feed);
    if !show.is_empty() {
        ctx.show_layers(session.layers(), show).await;
    }

    let snapshot = session.layers().snapshot();
    if ctx.json() {
        output::print_json(&snapshot)?;
        return Ok(());
    }

    Status::header("Layers");
    for layer in &snapshot {
        println!("  {:<18} {}", layer.label, colored_status(&layer.status));
    }
    Ok(())
}
