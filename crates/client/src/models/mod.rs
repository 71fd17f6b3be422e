//! Wire types exchanged with the catalogue API.
//!
//! Everything here is owned by the remote API; the client only holds
//! transient copies for display and editing.

pub mod auth;
pub mod common;
pub mod dashboard;
pub mod message;
pub mod product;

pub use auth::{AdminProfile, LoginResponse, ProfileUpdate};
pub use common::{Ack, CategoryList, Health, Saved};
pub use dashboard::{DashboardStats, MessageSummary, ProductSummary, StatsCounts};
pub use message::{Message, MessageList, MessageQuery, NewMessage};
pub use product::{Product, ProductDraft, ProductPage, ProductPatch, ProductQuery};
