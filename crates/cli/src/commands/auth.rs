//! `login`, `logout`, `whoami` and `profile`.

use jikoni_client::AdminClient;
use jikoni_client::api::LOGIN_FAILURE_MESSAGE;
use jikoni_client::forms::FormError;
use jikoni_client::models::ProfileUpdate;
use jikoni_client::views::login::{Event, LoginState, LoginView};
use jikoni_core::Email;
use secrecy::{ExposeSecret, SecretString};

use super::require_session;
use crate::error::CliError;
use crate::output::Output;

/// Log in through the same form logic the admin panel uses.
pub async fn login(
    client: &AdminClient,
    out: Output,
    username: &str,
    password: &SecretString,
) -> Result<(), CliError> {
    let mut view = LoginView::new();
    view.handle(Event::UsernameChanged(username.to_owned()));
    view.handle(Event::PasswordChanged(password.expose_secret().to_owned()));
    view.dispatch(client, Event::Submit).await;

    if view.state() == LoginState::Navigating {
        let user = client.session().user().await.ok_or(CliError::NotLoggedIn)?;
        out.line(&format!("Logged in as {}", user.username));
        return Ok(());
    }

    Err(CliError::Login(
        view.error().unwrap_or(LOGIN_FAILURE_MESSAGE).to_owned(),
    ))
}

pub async fn logout(client: &AdminClient, out: Output) -> Result<(), CliError> {
    if client.auth().logout().await? {
        out.line("Logged out");
    } else {
        out.line("Not logged in");
    }
    Ok(())
}

/// Profile stored with the session; no request is made.
pub async fn whoami(client: &AdminClient, out: Output) -> Result<(), CliError> {
    let user = client.session().user().await.ok_or(CliError::NotLoggedIn)?;
    out.profile(&user)
}

/// Show the profile, or update it when `email` or `new_password` is given.
pub async fn profile(
    client: &AdminClient,
    out: Output,
    email: Option<&str>,
    new_password: Option<SecretString>,
) -> Result<(), CliError> {
    require_session(client).await?;

    let update = ProfileUpdate {
        email: email
            .map(Email::parse)
            .transpose()
            .map_err(FormError::from)?,
        new_password,
    };

    let profile = if update.is_empty() {
        client.auth().profile().await?
    } else {
        let profile = client.auth().update_profile(&update).await?;
        out.line("Profile updated");
        profile
    };
    out.profile(&profile)
}
