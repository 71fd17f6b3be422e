//! Admin authentication types.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use jikoni_core::{AdminId, Email};

/// The logged-in admin, stored beside the bearer token.
///
/// Only `username` is guaranteed; older API builds return nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AdminId>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl AdminProfile {
    /// Profile carrying only a username.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
        }
    }
}

/// `POST /api/auth/login` response body.
///
/// Every field is optional so a malformed or error body reads as "no token".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub admin: Option<AdminProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Lenient parse: anything that is not the expected shape yields an
    /// empty response.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        serde_json::from_value(body.clone()).unwrap_or_default()
    }

    /// The token, if the server issued a non-empty one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// `PUT /api/auth/profile` request. Absent fields are left unchanged.
#[derive(Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<Email>,
    pub new_password: Option<SecretString>,
}

impl ProfileUpdate {
    /// Whether the update would change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.new_password.is_none()
    }

    /// Request body; only the fields that are set are sent.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(email) = &self.email {
            body.insert("email".into(), Value::String(email.to_string()));
        }
        if let Some(password) = &self.new_password {
            body.insert(
                "new_password".into(),
                Value::String(password.expose_secret().to_owned()),
            );
        }
        Value::Object(body)
    }
}

impl std::fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("email", &self.email)
            .field(
                "new_password",
                &self.new_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
