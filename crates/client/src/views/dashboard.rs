//! Dashboard landing page.

use tracing::{debug, instrument};

use super::Phase;
use crate::client::AdminClient;
use crate::error::ApiError;
use crate::models::{AdminProfile, DashboardStats};
use crate::navigator::Route;

#[derive(Debug)]
pub enum Event {
    /// Screen opened with the stored profile, `None` when logged out.
    Mounted { user: Option<AdminProfile> },
    Loaded(Result<DashboardStats, ApiError>),
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Redirect(Route),
    Fetch,
}

/// Uses only `Loading`, `Redirecting`, `Ready` and `Unmounted`.
#[derive(Debug, Default)]
pub struct DashboardView {
    phase: Phase,
    user: Option<AdminProfile>,
    stats: Option<DashboardStats>,
    error: Option<String>,
    mounted: bool,
}

impl DashboardView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Admin named in the greeting.
    #[must_use]
    pub const fn user(&self) -> Option<&AdminProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        if !self.phase.is_live() {
            debug!(phase = ?self.phase, ?event, "Ignoring event");
            return None;
        }

        match (self.phase, event) {
            (_, Event::Unmounted) => {
                self.phase = Phase::Unmounted;
                None
            }
            (_, Event::Mounted { .. }) if self.mounted => {
                debug!("Already mounted");
                None
            }
            (Phase::Loading, Event::Mounted { user: None }) => {
                self.mounted = true;
                self.phase = Phase::Redirecting;
                Some(Effect::Redirect(Route::Login))
            }
            (Phase::Loading, Event::Mounted { user }) => {
                self.mounted = true;
                self.user = user;
                Some(Effect::Fetch)
            }
            (Phase::Loading, Event::Loaded(result)) => {
                match result {
                    Ok(stats) => self.stats = Some(stats),
                    Err(e) if e.is_unauthorized() => {
                        self.phase = Phase::Redirecting;
                        return None;
                    }
                    Err(e) => self.error = Some(e.user_message()),
                }
                self.phase = Phase::Ready;
                None
            }
            (phase, event) => {
                debug!(?phase, ?event, "Event not valid in this phase");
                None
            }
        }
    }

    /// Run `event` and every resulting effect against `client`.
    #[instrument(skip_all)]
    pub async fn dispatch(&mut self, client: &AdminClient, event: Event) {
        let mut next = self.handle(event);
        while let Some(effect) = next {
            let event = match effect {
                Effect::Redirect(route) => {
                    client.navigate(route);
                    break;
                }
                Effect::Fetch => Event::Loaded(client.dashboard().stats().await),
            };
            next = self.handle(event);
        }
    }
}
