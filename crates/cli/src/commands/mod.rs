//! Command implementations.

pub mod auth;
pub mod info;
pub mod messages;
pub mod products;

use jikoni_client::AdminClient;

use crate::error::CliError;

/// Fail fast when a command needs a session and none is stored, the same
/// check an admin page makes before its first request.
pub async fn require_session(client: &AdminClient) -> Result<(), CliError> {
    if client.session().is_authenticated().await {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}
