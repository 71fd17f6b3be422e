//! CLI error type.

use jikoni_client::forms::FormError;
use jikoni_client::{ApiError, ConfigError};
use thiserror::Error;

/// Errors that end a command with exit code 1.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("{0}")]
    Form(#[from] FormError),

    /// Login was rejected; carries the message shown on the login form.
    #[error("Login failed: {0}")]
    Login(String),

    /// A destructive command was run without `--yes`.
    #[error("Refusing to delete {0} without --yes")]
    NotConfirmed(String),

    /// Command needs a session and none is stored.
    #[error("Not logged in. Run `jikoni login` first")]
    NotLoggedIn,

    /// The command reached a state it cannot report on.
    #[error("{0}")]
    Other(String),
}
