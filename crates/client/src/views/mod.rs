//! Admin screens as event-driven state machines.
//!
//! A view never performs I/O itself. [`handle`](ProductsView::handle) takes
//! one event, updates state, and returns at most one [`Effect`](products::Effect)
//! for the caller to run. Running the effect produces the next event. The
//! `dispatch` helpers on each view run that loop against an
//! [`AdminClient`](crate::AdminClient); a GUI event loop can instead run the
//! effects itself and feed results back whenever they arrive.
//!
//! Every view has an `Unmounted` state. Once unmounted, any event is ignored,
//! so a response that lands after the screen closed changes nothing.
//!
//! A 401 is never shown as a form error. The gateway has already cleared the
//! session and navigated to login; the view only moves to `Redirecting`.

pub mod dashboard;
pub mod login;
pub mod messages;
pub mod products;

pub use dashboard::DashboardView;
pub use login::LoginView;
pub use messages::MessagesView;
pub use products::ProductsView;

/// Lifecycle shared by the list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Mounted, first fetch in flight.
    #[default]
    Loading,
    /// No session; waiting for navigation to the login page.
    Redirecting,
    /// List shown, no modal.
    Ready,
    /// Create/edit or detail modal shown.
    ModalOpen,
    /// Modal submission in flight.
    Submitting,
    /// Screen closed; every later event is dropped.
    Unmounted,
}

impl Phase {
    /// Whether the view still reacts to events.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Unmounted | Self::Redirecting)
    }
}
