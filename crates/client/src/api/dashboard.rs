use tracing::instrument;

use crate::error::ApiError;
use crate::gateway::{Access, Gateway};
use crate::models::DashboardStats;

/// Aggregate counters for the dashboard landing page.
#[derive(Debug, Clone, Copy)]
pub struct DashboardClient<'a> {
    gateway: &'a Gateway,
}

impl<'a> DashboardClient<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Current counts, recomputed by the API on every call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token was rejected.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.gateway
            .get_json(Access::Bearer, "/api/dashboard/stats")
            .await
    }
}
