//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `JIKONI_API_URL` - Base URL of the REST API (default: `http://localhost:5000`)
//! - `JIKONI_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `JIKONI_SESSION_FILE` - Where the admin session is persisted
//!   (default: `<config dir>/jikoni/session.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL used when `JIKONI_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings for talking to the catalogue API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin without a trailing slash, e.g. `http://localhost:5000`
    pub base_url: String,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Session persistence file; `None` keeps the session in memory only
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Build a configuration for `base_url` with default timeout and no
    /// session persistence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not `http(s)`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url("JIKONI_API_URL", base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = normalize_base_url(
            "JIKONI_API_URL",
            &get_env_or_default("JIKONI_API_URL", DEFAULT_API_URL),
        )?;
        let timeout_secs = get_env_or_default("JIKONI_HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("JIKONI_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let session_file = get_optional_env("JIKONI_SESSION_FILE")
            .map(PathBuf::from)
            .or_else(default_session_file);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
        })
    }

    /// Persist the session at `path`.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jikoni").join("session.json"))
}

/// Validate an API origin and strip trailing slashes so that
/// `base_url + "/api/..."` never doubles them.
fn normalize_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed =
        Url::parse(trimmed).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ClientConfig::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert!(config.session_file.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_new_rejects_bad_urls() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "JIKONI_API_URL"
        ));
        assert!(ClientConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_default_points_at_local_api() {
        assert_eq!(ClientConfig::default().base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_session_file("/tmp/session.json")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
