//! Login, profile and logout.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::error::{ApiError, server_message};
use crate::gateway::{Access, Gateway, RequestOptions};
use crate::models::{AdminProfile, LoginResponse, ProfileUpdate};
use crate::navigator::Route;
use crate::session::SessionData;

/// Shown when a failed login carries neither a message nor a reason phrase.
pub const LOGIN_FAILURE_MESSAGE: &str = "Login failed";

/// Session establishment and the admin's own profile.
#[derive(Debug, Clone, Copy)]
pub struct AuthClient<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthClient<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a token and store it in the session.
    ///
    /// The call is unauthenticated: a 401 here means wrong credentials and
    /// leaves any existing session untouched. A 2xx without a usable token is
    /// a failed login too.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message (or the status
    /// reason phrase, or "Login failed") when no token was issued,
    /// `ApiError::Transport` if the API is unreachable and
    /// `ApiError::Session` if the new session cannot be persisted.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionData, ApiError> {
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        let options = RequestOptions::new().json(&body)?;
        let response = self
            .gateway
            .call_public(Method::POST, "/api/auth/login", options)
            .await?;

        let parsed = LoginResponse::from_body(&response.body);
        let token = match parsed.token() {
            Some(token) if response.is_success() => token.to_owned(),
            _ => {
                let message = server_message(&response.body)
                    .or_else(|| response.status.canonical_reason().map(str::to_owned))
                    .unwrap_or_else(|| LOGIN_FAILURE_MESSAGE.to_owned());
                debug!(status = %response.status, "Login rejected");
                return Err(ApiError::Api {
                    status: response.status.as_u16(),
                    message,
                });
            }
        };

        // Token and user must be stored together
        let user = parsed.admin.unwrap_or_else(|| {
            warn!("Login response had no admin record; using the submitted username");
            AdminProfile::named(username)
        });

        let data = SessionData {
            token: SecretString::from(token),
            user,
        };
        self.gateway
            .session()
            .set(data.token.clone(), data.user.clone())
            .await?;
        debug!("Logged in");
        Ok(data)
    }

    /// The logged-in admin's profile as the API sees it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token was rejected.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<AdminProfile, ApiError> {
        let body = self
            .gateway
            .get_json::<serde_json::Value>(Access::Bearer, "/api/auth/profile")
            .await?;
        decode_profile(body)
    }

    /// Change email and/or password. Only the fields that are set are sent.
    ///
    /// On success the stored profile is refreshed so `whoami` reflects the new
    /// email without another round trip.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` for an empty update, otherwise as
    /// [`AuthClient::profile`].
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<AdminProfile, ApiError> {
        if update.is_empty() {
            return Err(ApiError::Request("nothing to update".into()));
        }

        let body = self
            .gateway
            .send_json(Access::Bearer, Method::PUT, "/api/auth/profile", &update.to_body())
            .await?;

        let session = self.gateway.session();
        let profile = match (decode_profile(body), session.user().await) {
            (Ok(profile), _) => profile,
            // Acknowledgement only: patch what we know locally
            (Err(_), Some(mut profile)) => {
                if let Some(email) = &update.email {
                    profile.email = Some(email.clone());
                }
                profile
            }
            (Err(e), None) => return Err(e),
        };

        if let Some(current) = session.snapshot().await {
            session.set(current.token, profile.clone()).await?;
        }
        Ok(profile)
    }

    /// Forget the session and go to the login page. No request is made.
    ///
    /// Navigation happens even when the session file cannot be removed; the
    /// in-memory session is gone either way.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the session file cannot be removed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<bool, ApiError> {
        let cleared = self.gateway.session().clear().await;
        self.gateway.navigate(Route::Login);
        cleared.map_err(ApiError::from)
    }
}

/// Accept `{admin: {...}}`, `{user: {...}}` or a bare profile.
fn decode_profile(body: serde_json::Value) -> Result<AdminProfile, ApiError> {
    let inner = ["admin", "user"]
        .iter()
        .find_map(|key| body.get(*key).filter(|v| v.is_object()).cloned())
        .unwrap_or(body);
    serde_json::from_value(inner).map_err(|e| ApiError::Decode(format!("invalid profile: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_profile_shapes() {
        let wrapped = decode_profile(json!({"admin": {"username": "admin"}})).unwrap();
        assert_eq!(wrapped, AdminProfile::named("admin"));

        let bare = decode_profile(json!({"id": 1, "username": "owner"})).unwrap();
        assert_eq!(bare.username, "owner");

        assert!(decode_profile(json!({"message": "Profile updated"})).is_err());
    }
}
