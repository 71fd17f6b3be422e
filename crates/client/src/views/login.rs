//! Admin login form.

use secrecy::SecretString;
use tracing::{debug, instrument};

use crate::client::AdminClient;
use crate::error::ApiError;
use crate::navigator::Route;

/// Shown when either field is blank; no request is made.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter username and password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Idle,
    Submitting,
    /// Logged in; waiting for navigation to the dashboard.
    Navigating,
    Unmounted,
}

#[derive(Debug)]
pub enum Event {
    UsernameChanged(String),
    PasswordChanged(String),
    Submit,
    Finished(Result<(), ApiError>),
    Unmounted,
}

#[derive(Debug)]
pub enum Effect {
    Login {
        username: String,
        password: SecretString,
    },
    Redirect(Route),
}

#[derive(Default)]
pub struct LoginView {
    state: LoginState,
    username: String,
    password: String,
    error: Option<String>,
}

impl LoginView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Error banner above the form.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle(&mut self, event: Event) -> Option<Effect> {
        match (self.state, event) {
            (LoginState::Unmounted, _) => None,
            (_, Event::Unmounted) => {
                self.state = LoginState::Unmounted;
                None
            }

            (LoginState::Idle, Event::UsernameChanged(value)) => {
                self.username = value;
                None
            }
            (LoginState::Idle, Event::PasswordChanged(value)) => {
                self.password = value;
                None
            }
            (LoginState::Idle, Event::Submit) => {
                self.error = None;
                if self.username.is_empty() || self.password.is_empty() {
                    self.error = Some(MISSING_CREDENTIALS_MESSAGE.to_owned());
                    return None;
                }
                self.state = LoginState::Submitting;
                Some(Effect::Login {
                    username: self.username.clone(),
                    password: SecretString::from(self.password.clone()),
                })
            }
            (LoginState::Submitting, Event::Finished(Ok(()))) => {
                self.password.clear();
                self.state = LoginState::Navigating;
                Some(Effect::Redirect(Route::Dashboard))
            }
            (LoginState::Submitting, Event::Finished(Err(e))) => {
                self.error = Some(e.user_message());
                self.state = LoginState::Idle;
                None
            }

            (state, event) => {
                debug!(?state, ?event, "Event not valid in this state");
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
                Effect::Login { username, password } => Event::Finished(
                    client.auth().login(&username, &password).await.map(|_| ()),
                ),
                Effect::Redirect(route) => {
                    client.navigate(route);
                    break;
                }
            };
            next = self.handle(event);
        }
    }
}

impl std::fmt::Debug for LoginView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginView")
            .field("state", &self.state)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(username: &str, password: &str) -> LoginView {
        let mut view = LoginView::new();
        view.handle(Event::UsernameChanged(username.into()));
        view.handle(Event::PasswordChanged(password.into()));
        view
    }

    #[test]
    fn test_blank_fields_short_circuit() {
        let mut view = filled("admin", "");
        assert!(view.handle(Event::Submit).is_none());
        assert_eq!(view.error(), Some(MISSING_CREDENTIALS_MESSAGE));
        assert_eq!(view.state(), LoginState::Idle);
    }

    #[test]
    fn test_success_navigates_to_dashboard() {
        let mut view = filled("admin", "admin123");
        assert!(matches!(
            view.handle(Event::Submit),
            Some(Effect::Login { ref username, .. }) if username == "admin"
        ));
        assert_eq!(view.state(), LoginState::Submitting);
        assert!(matches!(
            view.handle(Event::Finished(Ok(()))),
            Some(Effect::Redirect(Route::Dashboard))
        ));
        assert_eq!(view.state(), LoginState::Navigating);
    }

    #[test]
    fn test_rejected_login_shows_server_message() {
        let mut view = filled("admin", "wrongpass");
        view.handle(Event::Submit);
        view.handle(Event::Finished(Err(ApiError::Api {
            status: 401,
            message: "invalid credentials".into(),
        })));
        assert_eq!(view.state(), LoginState::Idle);
        assert_eq!(view.error(), Some("invalid credentials"));

        // Resubmitting clears the previous error first
        view.handle(Event::Submit);
        assert!(view.error().is_none());
    }

    #[test]
    fn test_debug_hides_password() {
        let view = filled("admin", "admin123");
        assert!(!format!("{view:?}").contains("admin123"));
    }
}
