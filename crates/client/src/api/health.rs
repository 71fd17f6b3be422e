use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::{Access, Gateway};
use crate::models::Health;

#[derive(Debug, Clone, Copy)]
pub struct HealthClient<'a> {
    gateway: &'a Gateway,
}

impl<'a> HealthClient<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Liveness check.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the API is unreachable.
    #[instrument(skip(self))]
    pub async fn check(&self) -> Result<Health, ApiError> {
        self.gateway.get_json(Access::Public, "/api/health").await
    }
}
