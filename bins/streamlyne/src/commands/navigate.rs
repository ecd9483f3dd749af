//! Navigation hand-off command

use super::{select_nearest, Context, PointArgs};
use anyhow::{bail, Result};
use serde_json::json;
use streamlyne_cli::output;
use streamlyne_engine::{Handoff, MenuChoice};

/// Print the destination string for the source nearest to `point`
pub async fn run(ctx: &Context, point: PointArgs) -> Result<()> {
    let (mut controller, marker) = select_nearest(ctx, point).await?;
    let Some(Handoff::Navigate { destination }) = controller.choose(MenuChoice::Navigate)? else {
        bail!("Navigation is not available for {}", marker.title);
    };

    if ctx.json() {
        output::print_json(&json!({
            "title": marker.title,
            "layer": marker.layer,
            "destination": destination.to_string(),
            "coordinate": destination,
        }))?;
    } else {
        println!("{destination}");
    }
    Ok(())
}

