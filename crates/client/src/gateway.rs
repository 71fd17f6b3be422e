//! Authenticated request gateway.
//!
//! Every call to the API goes through [`Gateway`]. It
//!
//! - sends `Content-Type: application/json` on every request,
//! - attaches `Authorization: Bearer <token>` when the session holds a token,
//! - lets caller-supplied headers replace a default only when they name the
//!   same header,
//! - on a 401 for an authenticated call, clears the session and navigates to
//!   the login route before handing the response back.
//!
//! The gateway makes exactly one network attempt per call. Transport
//! failures surface as [`ApiError::Transport`] and never touch the session.
//! Once a status line has arrived, an unreadable body reads as `Null`.
//!
//! Unauthenticated endpoints (login, catalogue reads, contact submission)
//! go through [`Gateway::call_public`], which sends no token and never resets
//! the session: a wrong password at the login form is a form error, not an
//! expired session.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigator::{Navigator, Route};
use crate::session::Session;

/// Whether a call carries the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token, no session reset on 401.
    Public,
    /// Token attached when present; 401 resets the session.
    Bearer,
}

/// Per-call options: an optional JSON body and extra headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl RequestOptions {
    /// Options with no body and no extra headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| ApiError::Request(format!("unserializable body: {e}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    /// Add a header. A header named like one of the defaults replaces it.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A response with its body parsed as JSON.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Parsed body; `Value::Null` when empty or not JSON.
    pub body: Value,
    /// Set when this response cleared the session.
    pub session_reset: bool,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body for 2xx responses, an error otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the response reset the session,
    /// `ApiError::Api` for any other non-2xx status.
    pub fn into_body(self) -> Result<Value, ApiError> {
        if self.session_reset {
            return Err(ApiError::Unauthorized);
        }
        if !self.status.is_success() {
            return Err(ApiError::from_response(self.status, &self.body));
        }
        Ok(self.body)
    }

    /// Decode a 2xx body into `T`.
    ///
    /// # Errors
    ///
    /// As [`ApiResponse::into_body`], plus `ApiError::Decode` if the body does
    /// not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let body = self.into_body()?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Sends requests to the API on behalf of the current session.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    /// Build a gateway for `config`, reading tokens from `session` and
    /// reporting 401s to `navigator`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                http,
                base_url: config.base_url.clone(),
                session,
                navigator,
            }),
        })
    }

    /// The session this gateway reads from.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// API origin requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Ask the navigator to move to `route`.
    pub fn navigate(&self, route: Route) {
        self.inner.navigator.navigate(route);
    }

    /// Authenticated call: attaches the bearer token and resets the session
    /// on 401.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no response was received and
    /// `ApiError::Request` if the request could not be built. Non-2xx
    /// statuses are not errors at this layer.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Access::Bearer, method, path, options).await
    }

    /// Unauthenticated call: never sends a token, never resets the session.
    ///
    /// # Errors
    ///
    /// As [`Gateway::call`].
    pub async fn call_public(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(Access::Public, method, path, options).await
    }

    #[instrument(skip(self, options), fields(status))]
    async fn send(
        &self,
        access: Access,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Read once at call start; a concurrent clear does not affect this call
        if access == Access::Bearer
            && let Some(token) = self.inner.session.token().await
        {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| ApiError::Request("token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.http.request(method, &url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await.inspect_err(|e| {
            error!(error = %e, "Request failed before a response was received");
        })?;

        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        // Decided from the status alone; a broken body must not skip the reset
        let session_reset = access == Access::Bearer && status == StatusCode::UNAUTHORIZED;

        let body = match response.bytes().await {
            Ok(bytes) if bytes.is_empty() => Value::Null,
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                debug!(error = %e, "Response body is not JSON");
                Value::Null
            }),
            Err(e) => {
                debug!(error = %e, "Response body could not be read");
                Value::Null
            }
        };

        if session_reset {
            self.reset_session().await;
        } else {
            debug!(%status, "Response received");
        }

        Ok(ApiResponse {
            status,
            body,
            session_reset,
        })
    }

    /// Forget the session and send the user to the login page.
    ///
    /// Runs once per 401 even if the session was already gone, so a stale
    /// request racing a logout still lands on the login page.
    async fn reset_session(&self) {
        match self.inner.session.clear().await {
            Ok(true) => warn!("API rejected the session token; logged out"),
            Ok(false) => debug!("401 received with no session present"),
            Err(e) => error!(error = %e, "Failed to remove persisted session"),
        }
        self.inner.navigator.navigate(Route::Login);
    }

    // =========================================================================
    // Typed helpers for resource clients
    // =========================================================================

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        access: Access,
        path: &str,
    ) -> Result<T, ApiError> {
        self.send(access, Method::GET, path, RequestOptions::new())
            .await?
            .json()
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        access: Access,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let options = RequestOptions::new().json(body)?;
        self.send(access, method, path, options).await?.into_body()
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Access::Bearer, Method::DELETE, path, RequestOptions::new())
            .await?
            .into_body()
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
