//! Admin session: the bearer token and the profile it belongs to.
//!
//! # Lifecycle
//!
//! - Created by a successful login ([`Session::set`])
//! - Read at the start of every authenticated gateway call
//! - Destroyed by logout or by any 401 through the gateway ([`Session::clear`])
//!
//! Token and profile live in one `Option` behind one lock, so every reader
//! sees both or neither. No expiry is tracked locally; the API's answer to
//! each request is the only authority on whether the token is still good.
//!
//! # Persistence
//!
//! A session opened with [`Session::open`] survives restarts. The file holds
//! the same two keys the web front end keeps in local storage:
//!
//! ```json
//! { "admin_token": "eyJ...", "admin_user": { "username": "admin" } }
//! ```
//!
//! The file is rewritten (or removed) while the write lock is held, so disk
//! and memory never disagree after a transition completes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::models::AdminProfile;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "admin_token";

/// Storage key for the serialized admin profile.
pub const USER_KEY: &str = "admin_user";

/// Errors that can occur while persisting the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be serialized.
    #[error("Session serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Token and profile of the logged-in admin.
#[derive(Clone)]
pub struct SessionData {
    /// Opaque bearer token issued by the API.
    pub token: SecretString,
    /// Profile returned alongside the token.
    pub user: AdminProfile,
}

impl std::fmt::Debug for SessionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionData")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// On-disk layout. Both keys are optional so a half-written or hand-edited
/// file is detected rather than rejected.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "admin_token", default)]
    token: Option<String>,
    #[serde(rename = "admin_user", default)]
    user: Option<AdminProfile>,
}

/// Process-wide admin session, shared by every clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: RwLock<Option<SessionData>>,
    file: Option<PathBuf>,
}

impl Session {
    /// Empty session kept in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_state(None, None)
    }

    /// Open the session persisted at `path`, loading it if the file exists.
    ///
    /// An unreadable or inconsistent file (token without profile, invalid
    /// JSON) is treated as "logged out" rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => decode_stored(&bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        debug!(logged_in = state.is_some(), "Session loaded");
        Ok(Self::with_state(state, Some(path)))
    }

    fn with_state(state: Option<SessionData>, file: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(state),
                file,
            }),
        }
    }

    /// Store a new token and profile together, replacing any previous session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written; the
    /// in-memory session is left unchanged in that case.
    #[instrument(skip(self, token), fields(username = %user.username))]
    pub async fn set(&self, token: SecretString, user: AdminProfile) -> Result<(), SessionError> {
        let mut state = self.inner.state.write().await;
        let data = SessionData { token, user };

        if let Some(path) = &self.inner.file {
            write_stored(path, &data).await?;
        }

        *state = Some(data);
        debug!("Session established");
        Ok(())
    }

    /// Current bearer token, if logged in.
    pub async fn token(&self) -> Option<SecretString> {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .map(|data| data.token.clone())
    }

    /// Current admin profile, if logged in.
    pub async fn user(&self) -> Option<AdminProfile> {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .map(|data| data.user.clone())
    }

    /// Token and profile as one consistent snapshot.
    pub async fn snapshot(&self) -> Option<SessionData> {
        self.inner.state.read().await.clone()
    }

    /// Whether a token is present. Says nothing about whether the API will
    /// still accept it.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.is_some()
    }

    /// Remove token and profile. Idempotent.
    ///
    /// Returns `true` if a session was present.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the session file exists but cannot be
    /// removed. The in-memory session is cleared regardless.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<bool, SessionError> {
        let mut state = self.inner.state.write().await;
        let was_present = state.take().is_some();

        if let Some(path) = &self.inner.file {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if was_present {
            debug!("Session cleared");
        }
        Ok(was_present)
    }

    /// Path of the backing file, if persistent.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.inner.file.as_deref()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("file", &self.inner.file)
            .finish_non_exhaustive()
    }
}

fn decode_stored(bytes: &[u8]) -> Option<SessionData> {
    let stored: StoredSession = match serde_json::from_slice(bytes) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable session file");
            return None;
        }
    };

    match (stored.token.filter(|t| !t.is_empty()), stored.user) {
        (Some(token), Some(user)) => Some(SessionData {
            token: SecretString::from(token),
            user,
        }),
        (None, None) => None,
        _ => {
            warn!("Ignoring session file with token or user missing");
            None
        }
    }
}

/// Write to a sibling temp file then rename, so a crash never leaves a
/// truncated session behind.
async fn write_stored(path: &Path, data: &SessionData) -> Result<(), SessionError> {
    let stored = StoredSession {
        token: Some(data.token.expose_secret().to_owned()),
        user: Some(data.user.clone()),
    };
    let bytes = serde_json::to_vec_pretty(&stored)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("json.tmp");
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(&tmp).await?;
    tokio::io::AsyncWriteExt::write_all(&mut file, &bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
