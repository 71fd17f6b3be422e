//! Unified error handling for API calls.
//!
//! Every resource operation returns `Result<T, ApiError>`. The variants follow
//! how a failure should be surfaced to whoever started the action:
//!
//! - [`ApiError::Transport`] - no response at all; show a generic message
//! - [`ApiError::Unauthorized`] - the gateway already reset the session and
//!   redirected to login; views must not render it as a form error
//! - [`ApiError::Api`] - any other non-2xx; `message` is the server's text
//!   when it sent one
//! - [`ApiError::Decode`] - a 2xx whose body did not have the expected shape

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::session::SessionError;

/// Shown when a request never produced a response.
pub const CONNECT_FAILURE_MESSAGE: &str = "Unable to connect to server";

/// Shown for non-2xx responses whose body carries no message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Errors returned by the gateway and resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API rejected the bearer token; the session has been cleared.
    #[error("Unauthorized: session expired, please log in again")]
    Unauthorized,

    /// The API answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A successful response had an unexpected body.
    #[error("Parse error: {0}")]
    Decode(String),

    /// The request could not be built (bad header value, unserializable body).
    #[error("Invalid request: {0}")]
    Request(String),

    /// The session could not be persisted.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Build an [`ApiError::Api`] from a failed response.
    ///
    /// Uses the server's message when present, then the status reason phrase,
    /// then a generic fallback. Malformed bodies simply have no message.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &Value) -> Self {
        let message = server_message(body)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned());
        Self::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Whether the failure already triggered the session reset.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Text suitable for an inline error on the form that caused the call.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => CONNECT_FAILURE_MESSAGE.to_owned(),
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// The API uses `message`; its JWT layer answers with `msg`; some proxies
/// use `error`.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    ["message", "msg", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_response_prefers_server_message() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({"message": "Name is required"}),
        );
        assert_eq!(err.user_message(), "Name is required");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "API error: 422 - Name is required");
    }

    #[test]
    fn test_from_response_falls_back_to_reason_phrase() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, &Value::Null);
        assert_eq!(err.user_message(), "Bad Request");

        let odd = StatusCode::from_u16(599).unwrap_or(StatusCode::BAD_GATEWAY);
        let err = ApiError::from_response(odd, &json!(["not", "an", "object"]));
        assert!(!err.user_message().is_empty());
    }

    #[test]
    fn test_server_message_keys() {
        assert_eq!(
            server_message(&json!({"msg": "Token has expired"})).as_deref(),
            Some("Token has expired")
        );
        assert_eq!(server_message(&json!({"error": "boom"})).as_deref(), Some("boom"));
        assert_eq!(server_message(&json!({"message": "  "})), None);
        assert_eq!(server_message(&json!({"message": 5})), None);
    }

    #[test]
    fn test_unauthorized_is_flagged() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert!(!ApiError::Decode("x".into()).is_unauthorized());
    }
}
