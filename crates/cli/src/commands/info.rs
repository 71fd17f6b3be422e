//! Read-only commands: `stats`, `categories`, `health`.

use jikoni_client::views::Phase;
use jikoni_client::views::dashboard::{DashboardView, Event};
use jikoni_client::{AdminClient, ApiError};

use super::require_session;
use crate::error::CliError;
use crate::output::Output;

pub async fn stats(client: &AdminClient, out: Output) -> Result<(), CliError> {
    require_session(client).await?;

    let mut view = DashboardView::new();
    let user = client.session().user().await;
    view.dispatch(client, Event::Mounted { user }).await;

    match (view.phase(), view.stats(), view.error()) {
        (Phase::Redirecting, ..) => Err(ApiError::Unauthorized.into()),
        (_, Some(stats), _) => out.stats(stats),
        (_, None, Some(error)) => Err(CliError::Other(error.to_owned())),
        _ => Err(CliError::Other("Dashboard did not load".into())),
    }
}

pub async fn categories(client: &AdminClient, out: Output) -> Result<(), CliError> {
    let categories = client.categories().list().await?;
    out.categories(&categories)
}

pub async fn health(client: &AdminClient, out: Output) -> Result<(), CliError> {
    let health = client.health().check().await?;
    out.health(&health)?;
    if health.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Other(format!("API reports status {}", health.status)))
    }
}
