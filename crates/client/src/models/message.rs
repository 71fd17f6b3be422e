//! Inbound contact messages.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use jikoni_core::{Email, MessageId, MessageStatus, Timestamp};

use super::common::empty_string_as_none;

/// A contact message as stored by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub name: String,
    pub email: Email,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Public contact-form submission (`POST /api/messages`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// Filters for `GET /api/messages`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageQuery {
    pub status: Option<MessageStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl MessageQuery {
    /// Only messages with `status`.
    #[must_use]
    pub const fn with_status(status: MessageStatus) -> Self {
        Self {
            status: Some(status),
            page: None,
            per_page: None,
        }
    }

    /// `/api/messages` with the query string appended when any filter is set.
    #[must_use]
    pub fn path(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut any = false;

        if let Some(status) = self.status {
            query.append_pair("status", status.as_str());
            any = true;
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            query.append_pair("page", &page.to_string());
            any = true;
        }
        if let Some(per_page) = self.per_page.filter(|p| *p > 0) {
            query.append_pair("per_page", &per_page.to_string());
            any = true;
        }

        if any {
            format!("/api/messages?{}", query.finish())
        } else {
            "/api/messages".to_string()
        }
    }
}

/// `GET /api/messages` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

impl MessageList {
    /// Messages nobody has opened yet.
    #[must_use]
    pub fn unread(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.status == MessageStatus::New)
            .count()
    }
}
