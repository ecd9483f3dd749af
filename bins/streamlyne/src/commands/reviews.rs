//! Review listing command

use super::{select_nearest, Context, PointArgs};
use anyhow::{bail, Context as _, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use streamlyne_api_client::{Review, StreamlyneClient};
use streamlyne_cli::output::{self, format_count};
use streamlyne_cli::{progress, Status};
use streamlyne_engine::{Handoff, Marker, MenuChoice};

#[derive(Serialize)]
struct Listing<'a> {
    marker: &'a Marker,
    reviews: &'a [Review],
}

/// List reviews stored for the source nearest to `point`
///
/// The lookup uses the source's own coordinate, not the typed point.
pub async fn run(ctx: &Context, point: PointArgs) -> Result<()> {
    let (mut controller, marker) = select_nearest(ctx, point).await?;
    let Some(Handoff::ListReviews(marker)) = controller.choose(MenuChoice::SeeReviews)? else {
        bail!("Reviews are not available for {}", marker.title);
    };
    let client = StreamlyneClient::new()?;

    let pb = progress::spinner_unless(ctx.json(), "Fetching reviews...");
    let reviews = match client.reviews().for_coordinate(marker.coordinate).await {
        Ok(reviews) => {
            progress::finish_success(&pb, &format_count(reviews.len(), "review", "reviews"));
            reviews
        }
        Err(e) => {
            progress::finish_error(&pb, "Could not fetch reviews");
            return Err(e).with_context(|| {
                format!("Could not fetch reviews for {} at {}", marker.title, marker.coordinate)
            });
        }
    };

    if ctx.json() {
        output::print_json(&Listing {
            marker: &marker,
            reviews: &reviews,
        })?;
        return Ok(());
    }

    Status::header(&format!("Reviews for {} ({})", marker.title, marker.coordinate));
    if reviews.is_empty() {
        println!("  No reviews available for this location.");
        return Ok(());
    }
    for review in &reviews {
        println!("  \"{}\"", review.review);
        println!("    {} {}", "by".dimmed(), review.user_email.cyan());
    }
    Ok(())
}
