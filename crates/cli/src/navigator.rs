//! Turns navigation requests into hints on the terminal.

use jikoni_client::{Navigator, Route};
use tracing::{info, warn};

/// Logs where a browser would have gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => warn!("Session ended. Log in again with `jikoni login`"),
            other => info!(route = %other, "Continue in the admin panel"),
        }
    }
}
