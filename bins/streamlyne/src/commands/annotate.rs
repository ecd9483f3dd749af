//! Review and outbreak submission commands

use super::{choose_on_nearest, Context, PointArgs};
use anyhow::Result;
use serde::Serialize;
use streamlyne_api_client::StreamlyneClient;
use streamlyne_cli::{output, progress, Status};
use streamlyne_engine::{AuthSession, Marker, MenuChoice};

/// Sign-in details from flags or the environment
#[derive(Debug, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct Submitted<'a, T> {
    marker: &'a Marker,
    record: T,
}

/// Sign in when any credential was given
///
/// With none at all the review goes ahead without a session and is
/// rejected locally.
async fn sign_in(
    client: &StreamlyneClient,
    credentials: Credentials,
) -> Result<Option<AuthSession>> {
    if credentials.email.is_none() && credentials.password.is_none() {
        return Ok(None);
    }
    let email = credentials.email.unwrap_or_default();
    let password = credentials.password.unwrap_or_default();
    Ok(Some(client.auth().sign_in_with_password(&email, &password).await?))
}

/// Review the source nearest to `point`
pub async fn review(
    ctx: &Context,
    point: PointArgs,
    text: &str,
    credentials: Credentials,
) -> Result<()> {
    let client = StreamlyneClient::new()?;
    let session = sign_in(&client, credentials).await?;

    let (mut controller, marker) = choose_on_nearest(ctx, point, MenuChoice::LeaveReview).await?;
    controller.edit_review(text)?;

    let pb = progress::spinner_unless(ctx.json(), "Submitting review...");
    let record = match controller.submit_review(&client, session.as_ref()).await {
        Ok(record) => record,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    if ctx.json() {
        output::print_json(&Submitted { marker: &marker, record })?;
    } else {
        Status::success(&format!("Review submitted for {}", marker.title));
    }
    Ok(())
}

/// Report an outbreak at the source nearest to `point`
pub async fn outbreak(
    ctx: &Context,
    point: PointArgs,
    disease: &str,
    description: &str,
) -> Result<()> {
    let client = StreamlyneClient::new()?;

    let (mut controller, marker) = choose_on_nearest(ctx, point, MenuChoice::ReportOutbreak).await?;
    controller.edit_outbreak(disease, description)?;

    let pb = progress::spinner_unless(ctx.json(), "Reporting outbreak...");
    let record = match controller.submit_outbreak(&client).await {
        Ok(record) => record,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    if ctx.json() {
        output::print_json(&Submitted { marker: &marker, record })?;
    } else {
        Status::success("Outbreak reported successfully!");
    }
    Ok(())
}
