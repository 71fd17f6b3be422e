//! Login, logout, profile and session persistence.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use jikoni_client::models::{AdminProfile, ProfileUpdate};
use jikoni_client::navigator::ChannelNavigator;
use jikoni_client::views::login::{Event, LoginState, LoginView, MISSING_CREDENTIALS_MESSAGE};
use jikoni_client::{AdminClient, ApiError, Route, Session};
use jikoni_core::Email;
use jikoni_integration_tests::{ADMIN_PASSWORD, ADMIN_TOKEN, ADMIN_USERNAME, MockApi};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

async fn submit(view: &mut LoginView, client: &AdminClient, username: &str, password: &str) {
    view.handle(Event::UsernameChanged(username.into()));
    view.handle(Event::PasswordChanged(password.into()));
    view.dispatch(client, Event::Submit).await;
}

#[tokio::test]
async fn test_login_stores_session_and_goes_to_dashboard() {
    let api = MockApi::start().await.unwrap();
    api.respond(
        Method::POST,
        "/api/auth/login",
        StatusCode::OK,
        json!({"token": "abc", "admin": {"id": 1, "username": "admin"}}),
    )
    .await;
    let (client, mut routes) = api.client().unwrap();

    let mut view = LoginView::new();
    submit(&mut view, &client, "admin", "admin123").await;

    assert_eq!(view.state(), LoginState::Navigating);
    assert!(view.error().is_none());
    let data = client.session().snapshot().await.unwrap();
    assert_eq!(data.token.expose_secret(), "abc");
    assert_eq!(data.user.username, "admin");
    assert_eq!(routes.try_recv().ok(), Some(Route::Dashboard));
    assert!(routes.try_recv().is_err());

    let requests = api.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        json!({"username": "admin", "password": "admin123"})
    );
    assert!(requests[0].authorization().is_none());
}

#[tokio::test]
async fn test_wrong_password_shows_server_message() {
    let api = MockApi::start().await.unwrap();
    let (client, mut routes) = api.client().unwrap();

    let mut view = LoginView::new();
    submit(&mut view, &client, ADMIN_USERNAME, "wrong").await;

    assert_eq!(view.state(), LoginState::Idle);
    assert_eq!(view.error(), Some("Invalid credentials"));
    assert!(client.session().snapshot().await.is_none());
    assert!(routes.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let api = MockApi::start().await.unwrap();
    let session = Session::in_memory();
    session
        .set(SecretString::from("previous"), AdminProfile::named("admin"))
        .await
        .unwrap();
    let (client, mut routes) = api.client_with_session(session).unwrap();

    let err = client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from("wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!err.is_unauthorized());

    let token = client.session().token().await.unwrap();
    assert_eq!(token.expose_secret(), "previous");
    assert!(routes.try_recv().is_err());
}

#[tokio::test]
async fn test_blank_fields_never_reach_the_api() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = api.client().unwrap();

    let mut view = LoginView::new();
    submit(&mut view, &client, "admin", "").await;

    assert_eq!(view.error(), Some(MISSING_CREDENTIALS_MESSAGE));
    assert!(api.requests().await.is_empty());
}

#[tokio::test]
async fn test_token_less_success_is_a_failure() {
    let api = MockApi::start().await.unwrap();
    api.respond(Method::POST, "/api/auth/login", StatusCode::OK, json!({}))
        .await;
    let (client, _routes) = api.client().unwrap();

    let err = client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(200));
    assert_eq!(err.user_message(), "OK");
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_missing_admin_record_uses_submitted_username() {
    let api = MockApi::start().await.unwrap();
    api.respond(
        Method::POST,
        "/api/auth/login",
        StatusCode::OK,
        json!({"token": "abc"}),
    )
    .await;
    let (client, _routes) = api.client().unwrap();

    let data = client
        .auth()
        .login("wanjiku", &SecretString::from("secret"))
        .await
        .unwrap();
    assert_eq!(data.user, AdminProfile::named("wanjiku"));
    assert_eq!(client.session().user().await, Some(AdminProfile::named("wanjiku")));
}

#[tokio::test]
async fn test_unreachable_api_shows_connect_message() {
    // Nothing listens on the discard port
    let config = jikoni_client::ClientConfig::new("http://127.0.0.1:9").unwrap();
    let (navigator, _routes) = ChannelNavigator::channel();
    let client = AdminClient::new(&config, Session::in_memory(), Arc::new(navigator)).unwrap();

    let mut view = LoginView::new();
    submit(&mut view, &client, "admin", "admin123").await;

    assert_eq!(view.error(), Some("Unable to connect to server"));
    assert_eq!(view.state(), LoginState::Idle);
}

#[tokio::test]
async fn test_session_file_survives_restart_and_logout_removes_it() {
    let api = MockApi::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let config = api.config().with_session_file(&path);

    {
        let (navigator, _routes) = ChannelNavigator::channel();
        let client = AdminClient::from_config(&config, Arc::new(navigator))
            .await
            .unwrap();
        client
            .auth()
            .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
            .await
            .unwrap();
    }
    assert!(path.exists());

    let (navigator, mut routes) = ChannelNavigator::channel();
    let client = AdminClient::from_config(&config, Arc::new(navigator))
        .await
        .unwrap();
    let token = client.session().token().await.unwrap();
    assert_eq!(token.expose_secret(), ADMIN_TOKEN);

    // The restored token is good for protected calls
    let profile = client.auth().profile().await.unwrap();
    assert_eq!(profile.username, ADMIN_USERNAME);

    assert!(client.auth().logout().await.unwrap());
    assert!(!path.exists());
    assert_eq!(routes.try_recv().ok(), Some(Route::Login));
    assert!(!client.auth().logout().await.unwrap());
}

#[tokio::test]
async fn test_profile_update_refreshes_stored_user() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = api.client().unwrap();
    client
        .auth()
        .login(ADMIN_USERNAME, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap();

    let update = ProfileUpdate {
        email: Some(Email::parse("studio@jikonistudios.com").unwrap()),
        new_password: None,
    };
    let profile = client.auth().update_profile(&update).await.unwrap();
    assert_eq!(
        profile.email.map(|e| e.to_string()).as_deref(),
        Some("studio@jikonistudios.com")
    );

    let stored = client.session().user().await.unwrap();
    assert_eq!(
        stored.email.map(|e| e.to_string()).as_deref(),
        Some("studio@jikonistudios.com")
    );

    let put = api.requests_to(&Method::PUT, "/api/auth/profile").await;
    assert_eq!(put.len(), 1);
    assert_eq!(put[0].body, json!({"email": "studio@jikonistudios.com"}));
}

#[tokio::test]
async fn test_empty_profile_update_is_rejected_locally() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = api.client().unwrap();

    let err = client
        .auth()
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert!(api.requests().await.is_empty());
}

#[tokio::test]
async fn test_logout_navigates_even_when_session_file_is_stuck() {
    let api = MockApi::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = Session::open(&path).await.unwrap();
    session
        .set(SecretString::from(ADMIN_TOKEN), AdminProfile::named("admin"))
        .await
        .unwrap();

    // A directory where the file was cannot be removed with remove_file
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), b"x").unwrap();

    let (client, mut routes) = api.client_with_session(session).unwrap();
    let err = client.auth().logout().await.unwrap_err();

    assert!(matches!(err, ApiError::Session(_)));
    assert!(!client.session().is_authenticated().await);
    assert_eq!(routes.try_recv().ok(), Some(Route::Login));
}
