//! Authenticated request gateway against the mock API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{HeaderValue, Method, StatusCode, header};
use jikoni_client::gateway::RequestOptions;
use jikoni_client::models::{AdminProfile, MessageQuery};
use jikoni_client::{ApiError, Route, Session};
use jikoni_integration_tests::{ADMIN_TOKEN, MockApi};
use secrecy::SecretString;
use serde_json::json;

async fn logged_in_session(token: &str) -> Session {
    let session = Session::in_memory();
    session
        .set(SecretString::from(token), AdminProfile::named("admin"))
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn test_bearer_header_sent_when_token_present() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = api
        .client_with_session(logged_in_session(ADMIN_TOKEN).await)
        .unwrap();

    let response = client
        .gateway()
        .call(Method::GET, "/api/dashboard/stats", RequestOptions::new())
        .await
        .unwrap();
    assert!(response.is_success());

    let requests = api.requests().await;
    assert_eq!(requests.len(), 1);
    let expected = format!("Bearer {ADMIN_TOKEN}");
    assert_eq!(requests[0].authorization(), Some(expected.as_str()));
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let api = MockApi::start().await.unwrap();
    let (client, mut routes) = api.client().unwrap();

    let response = client
        .gateway()
        .call(Method::GET, "/api/dashboard/stats", RequestOptions::new())
        .await
        .unwrap();

    // The server refuses, the gateway still resets and redirects
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.session_reset);
    assert_eq!(routes.try_recv().ok(), Some(Route::Login));

    let requests = api.requests().await;
    assert!(requests[0].authorization().is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_navigates_once() {
    let api = MockApi::start().await.unwrap();
    let (client, mut routes) = api
        .client_with_session(logged_in_session("expired-token").await)
        .unwrap();

    let response = client
        .gateway()
        .call(Method::GET, "/api/messages", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["msg"], "Token has expired");
    assert!(!client.session().is_authenticated().await);
    assert!(client.session().user().await.is_none());

    assert_eq!(routes.try_recv().ok(), Some(Route::Login));
    assert!(routes.try_recv().is_err());

    // Resource clients surface the reset as Unauthorized
    let err = client.messages().list(MessageQuery::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = api.client().unwrap();

    let options = RequestOptions::new()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .header(
            header::HeaderName::from_static("x-request-source"),
            HeaderValue::from_static("cli"),
        );
    client
        .gateway()
        .call_public(Method::GET, "/api/health", options)
        .await
        .unwrap();

    let requests = api.requests().await;
    assert_eq!(requests[0].header("content-type"), Some("text/plain"));
    assert_eq!(requests[0].header("x-request-source"), Some("cli"));
}

#[tokio::test]
async fn test_non_json_and_server_errors_are_values_not_errors() {
    let api = MockApi::start().await.unwrap();
    api.respond(
        Method::GET,
        "/api/health",
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::Value::Null,
    )
    .await;
    let (client, _routes) = api.client().unwrap();

    let response = client
        .gateway()
        .call_public(Method::GET, "/api/health", RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body.is_null());
    assert!(!response.session_reset);

    let err = client.health().check().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "Internal Server Error");
}

#[tokio::test]
async fn test_public_401_leaves_session_alone() {
    let api = MockApi::start().await.unwrap();
    api.respond(
        Method::GET,
        "/api/categories",
        StatusCode::UNAUTHORIZED,
        json!({"message": "nope"}),
    )
    .await;
    let (client, mut routes) = api
        .client_with_session(logged_in_session(ADMIN_TOKEN).await)
        .unwrap();

    let err = client.categories().list().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!err.is_unauthorized());
    assert!(client.session().is_authenticated().await);
    assert!(routes.try_recv().is_err());

    // Public calls never carry the token
    assert!(api.requests().await[0].authorization().is_none());
}

#[tokio::test]
async fn test_concurrent_401s_each_reset_idempotently() {
    let api = MockApi::start().await.unwrap();
    let (client, mut routes) = api
        .client_with_session(logged_in_session("expired-token").await)
        .unwrap();

    let messages = client.messages();
    let (first, second) = tokio::join!(
        messages.list(MessageQuery::default()),
        messages.list(MessageQuery::with_status(jikoni_core::MessageStatus::New)),
    );
    assert!(matches!(first, Err(ApiError::Unauthorized)));
    assert!(matches!(second, Err(ApiError::Unauthorized)));

    // Both requests left with the same stale token
    let requests = api.requests_to(&Method::GET, "/api/messages").await;
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|r| r.authorization() == Some("Bearer expired-token"))
    );

    assert!(client.session().snapshot().await.is_none());
    assert_eq!(routes.try_recv().ok(), Some(Route::Login));
    assert_eq!(routes.try_recv().ok(), Some(Route::Login));
    assert!(routes.try_recv().is_err());
}
