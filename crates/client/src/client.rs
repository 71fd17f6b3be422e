//! Entry point tying config, session, gateway and navigator together.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::{
    AuthClient, CategoriesClient, DashboardClient, HealthClient, MessagesClient, ProductsClient,
};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::navigator::{Navigator, NoopNavigator, Route};
use crate::session::Session;

/// Admin API client. Cheap to clone; clones share one session.
#[derive(Debug, Clone)]
pub struct AdminClient {
    gateway: Gateway,
}

impl AdminClient {
    /// Client over an existing session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            gateway: Gateway::new(config, session, navigator)?,
        })
    }

    /// Client whose session is loaded from `config.session_file`, or kept in
    /// memory when no file is configured.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the session file exists but cannot be
    /// read.
    #[instrument(skip_all, fields(base_url = %config.base_url))]
    pub async fn from_config(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let session = match &config.session_file {
            Some(path) => Session::open(path).await?,
            None => Session::in_memory(),
        };
        info!(persistent = config.session_file.is_some(), "Admin client ready");
        Self::new(config, session, navigator)
    }

    /// In-memory client that ignores navigation.
    ///
    /// # Errors
    ///
    /// As [`AdminClient::new`].
    pub fn detached(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config, Session::in_memory(), Arc::new(NoopNavigator))
    }

    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    pub fn navigate(&self, route: Route) {
        self.gateway.navigate(route);
    }

    #[must_use]
    pub const fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.gateway)
    }

    #[must_use]
    pub const fn products(&self) -> ProductsClient<'_> {
        ProductsClient::new(&self.gateway)
    }

    #[must_use]
    pub const fn messages(&self) -> MessagesClient<'_> {
        MessagesClient::new(&self.gateway)
    }

    #[must_use]
    pub const fn dashboard(&self) -> DashboardClient<'_> {
        DashboardClient::new(&self.gateway)
    }

    #[must_use]
    pub const fn categories(&self) -> CategoriesClient<'_> {
        CategoriesClient::new(&self.gateway)
    }

    #[must_use]
    pub const fn health(&self) -> HealthClient<'_> {
        HealthClient::new(&self.gateway)
    }
}
