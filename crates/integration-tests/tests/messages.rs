//! Contact messages, the inbox screen and the dashboard.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use jikoni_client::forms::{ContactForm, FormError};
use jikoni_client::models::{AdminProfile, MessageQuery};
use jikoni_client::views::messages::{self, MessagesView};
use jikoni_client::views::{DashboardView, Phase, dashboard};
use jikoni_client::{AdminClient, Route, Session};
use jikoni_core::{MessageId, MessageStatus};
use jikoni_integration_tests::{ADMIN_TOKEN, MockApi};
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

async fn admin(api: &MockApi) -> (AdminClient, UnboundedReceiver<Route>) {
    let session = Session::in_memory();
    session
        .set(SecretString::from(ADMIN_TOKEN), AdminProfile::named("admin"))
        .await
        .unwrap();
    api.client_with_session(session).unwrap()
}

#[tokio::test]
async fn test_contact_form_is_public() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = api.client().unwrap();

    let form = ContactForm {
        name: "Akinyi".into(),
        email: "akinyi@example.com".into(),
        phone: "  ".into(),
        message: "Please quote a walk-in wardrobe".into(),
    };
    let ack = client
        .messages()
        .submit(&form.to_new_message().unwrap())
        .await
        .unwrap();
    assert_eq!(ack.message.as_deref(), Some("Message sent successfully"));

    let requests = api.requests().await;
    assert!(requests[0].authorization().is_none());
    assert!(requests[0].body.get("phone").is_none_or(serde_json::Value::is_null));
    assert_eq!(api.messages().await.len(), 3);
}

#[test]
fn test_contact_form_validates_before_sending() {
    let form = ContactForm {
        name: "Akinyi".into(),
        email: "not-an-email".into(),
        phone: String::new(),
        message: "Hello".into(),
    };
    assert!(matches!(form.to_new_message(), Err(FormError::Email(_))));

    let blank = ContactForm {
        message: "   ".into(),
        ..form
    };
    assert!(matches!(
        blank.to_new_message(),
        Err(FormError::Required(_))
    ));
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = admin(&api).await;

    let list = client
        .messages()
        .list(MessageQuery::with_status(MessageStatus::New))
        .await
        .unwrap();
    assert_eq!(list.messages.len(), 1);
    assert_eq!(list.unread(), 1);

    let requests = api.requests_to(&Method::GET, "/api/messages").await;
    assert_eq!(requests[0].query.as_deref(), Some("status=new"));
}

#[tokio::test]
async fn test_get_and_delete_message() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = admin(&api).await;

    let message = client.messages().get(MessageId::new(2)).await.unwrap();
    assert_eq!(message.status, MessageStatus::Read);
    assert_eq!(message.phone.as_deref(), Some("+254700000000"));

    client.messages().delete(MessageId::new(2)).await.unwrap();
    let err = client.messages().get(MessageId::new(2)).await.unwrap_err();
    assert_eq!(err.user_message(), "Message not found");
}

#[tokio::test]
async fn test_inbox_mark_read_updates_and_refetches() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = admin(&api).await;

    let mut view = MessagesView::new();
    view.dispatch(&client, messages::Event::Mounted { has_token: true })
        .await;
    assert_eq!(view.phase(), Phase::Ready);
    assert_eq!(view.unread(), 1);

    view.dispatch(&client, messages::Event::Open(MessageId::new(1)))
        .await;
    assert_eq!(view.phase(), Phase::ModalOpen);
    api.reset_requests().await;

    view.dispatch(&client, messages::Event::Mark(MessageStatus::Read))
        .await;
    assert_eq!(view.phase(), Phase::Ready);
    assert_eq!(view.unread(), 0);

    let requests = api.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::PUT);
    assert_eq!(requests[0].path, "/api/messages/1");
    assert_eq!(requests[0].body, json!({"status": "read"}));
    assert_eq!(requests[1].method, Method::GET);
}

#[tokio::test]
async fn test_inbox_filter_change_refetches() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = admin(&api).await;

    let mut view = MessagesView::new();
    view.dispatch(&client, messages::Event::Mounted { has_token: true })
        .await;
    view.dispatch(
        &client,
        messages::Event::FilterChanged(Some(MessageStatus::Read)),
    )
    .await;

    assert_eq!(view.messages().len(), 1);
    assert!(view.messages().iter().all(|m| m.status == MessageStatus::Read));
}

#[tokio::test]
async fn test_dashboard_shows_counts() {
    let api = MockApi::start().await.unwrap();
    let (client, _routes) = admin(&api).await;

    let mut view = DashboardView::new();
    let user = client.session().user().await;
    view.dispatch(&client, dashboard::Event::Mounted { user })
        .await;

    assert_eq!(view.phase(), Phase::Ready);
    assert_eq!(view.user().unwrap().username, "admin");
    let stats = view.stats().unwrap();
    assert_eq!(stats.stats.total_products, 3);
    assert_eq!(stats.stats.featured_products, 1);
    assert_eq!(stats.stats.new_messages, 1);
    assert_eq!(stats.recent_messages.len(), 2);
}

#[tokio::test]
async fn test_dashboard_with_revoked_token_goes_to_login() {
    let api = MockApi::start().await.unwrap();
    api.respond(
        Method::GET,
        "/api/dashboard/stats",
        StatusCode::UNAUTHORIZED,
        json!({"msg": "Token has been revoked"}),
    )
    .await;
    let (client, mut routes) = admin(&api).await;

    let mut view = DashboardView::new();
    let user = client.session().user().await;
    view.dispatch(&client, dashboard::Event::Mounted { user })
        .await;

    assert_eq!(view.phase(), Phase::Redirecting);
    assert!(view.error().is_none());
    assert_eq!(routes.try_recv().ok(), Some(Route::Login));
    assert!(routes.try_recv().is_err());
}
