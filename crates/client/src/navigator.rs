//! Navigation side channel.
//!
//! The gateway and the views never own the screen; they ask a [`Navigator`]
//! to move somewhere. A GUI would switch pages, the CLI prints a hint, and
//! tests count the requests.

use tokio::sync::mpsc;
use tracing::debug;

/// Admin destinations the client can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Products,
    Messages,
}

impl Route {
    /// Path of the admin page for this route.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Login => "/admin/login",
            Self::Dashboard => "/admin/dashboard",
            Self::Products => "/admin/products",
            Self::Messages => "/admin/messages",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives navigation requests.
///
/// Called synchronously from inside request handling, so implementations
/// must not block.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: Route) {
        debug!(%route, "Navigation ignored");
    }
}

/// Forwards requests to an event loop over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    /// Navigator plus the receiving end for the event loop.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.tx.send(route).is_err() {
            debug!(%route, "Navigation receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/admin/login");
        assert_eq!(Route::Dashboard.to_string(), "/admin/dashboard");
    }

    #[test]
    fn test_channel_navigator_delivers_in_order() {
        let (navigator, mut rx) = ChannelNavigator::channel();
        navigator.navigate(Route::Login);
        navigator.navigate(Route::Dashboard);
        assert_eq!(rx.try_recv().ok(), Some(Route::Login));
        assert_eq!(rx.try_recv().ok(), Some(Route::Dashboard));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_navigator_survives_dropped_receiver() {
        let (navigator, rx) = ChannelNavigator::channel();
        drop(rx);
        navigator.navigate(Route::Login);
    }
}
