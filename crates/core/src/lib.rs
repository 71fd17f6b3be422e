//! Jikoni Core - Shared types library.
//!
//! This crate provides the domain vocabulary used across the workspace:
//! - `client` - REST client, session and admin view state machines
//! - `cli` - Command-line admin front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and usable from any front end.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, categories,
//!   message statuses and server timestamps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
