//! Small response shapes shared by several endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use jikoni_core::Category;

use crate::error::{ApiError, server_message};

/// Acknowledgement body such as `{"message": "Message deleted"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// Read an acknowledgement out of any JSON body; non-objects have no message.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        Self {
            message: server_message(body),
        }
    }
}

/// Liveness check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Health {
    /// Whether the API reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// `GET /api/categories` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

/// Result of a create or update.
///
/// Some endpoints echo the canonical record (bare or under a key such as
/// `product`), others only acknowledge. Both are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    /// The server's canonical representation, when it sent one.
    pub record: Option<T>,
    /// Acknowledgement text, when present.
    pub message: Option<String>,
}

impl<T: serde::de::DeserializeOwned> Saved<T> {
    /// Extract the record stored under `key`, or the whole body when it looks
    /// like a bare record (has an `id`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when a record is present but malformed.
    pub fn from_body(body: Value, key: &str) -> Result<Self, ApiError> {
        let message = server_message(&body);
        let raw = match body {
            Value::Object(mut map) => match map.remove(key) {
                Some(inner) if !inner.is_null() => Some(inner),
                _ if map.contains_key("id") => Some(Value::Object(map)),
                _ => None,
            },
            _ => None,
        };

        let record = raw
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| ApiError::Decode(format!("invalid {key} record: {e}")))?;

        Ok(Self { record, message })
    }

    /// The record, or a decode error naming what was missing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body carried no record.
    pub fn require(self, what: &str) -> Result<T, ApiError> {
        self.record
            .ok_or_else(|| ApiError::Decode(format!("response did not include a {what}")))
    }
}

/// Treat `""` (how the API stores an omitted optional column) as absent.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
