//! Jikoni Client - REST client for the Jikoni Studios admin API.
//!
//! # Layers
//!
//! - [`session`] - Bearer token and admin profile, optionally persisted
//! - [`gateway`] - Every HTTP call; attaches the token and resets the session
//!   on 401
//! - [`api`] - Typed clients per resource (products, messages, dashboard,
//!   categories, auth, health)
//! - [`views`] - Admin screens as event-driven state machines
//!
//! # Example
//!
//! ```ignore
//! let config = ClientConfig::from_env()?;
//! let admin = AdminClient::from_config(&config, Arc::new(NoopNavigator)).await?;
//! admin.auth().login("admin", &password).await?;
//! let stats = admin.dashboard().stats().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod navigator;
pub mod session;
pub mod views;

pub use client::AdminClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use navigator::{ChannelNavigator, Navigator, NoopNavigator, Route};
pub use session::{Session, SessionData, SessionError};
