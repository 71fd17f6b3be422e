//! Typed façades over the REST endpoints.
//!
//! Each client borrows the shared [`Gateway`](crate::gateway::Gateway) and
//! maps one resource's endpoints to typed calls. They are obtained from
//! [`AdminClient`](crate::AdminClient):
//!
//! ```ignore
//! let page = admin.products().list(ProductQuery::default().page(2)).await?;
//! ```

mod auth;
mod categories;
mod dashboard;
mod health;
mod messages;
mod products;

pub use auth::{AuthClient, LOGIN_FAILURE_MESSAGE};
pub use categories::CategoriesClient;
pub use dashboard::DashboardClient;
pub use health::HealthClient;
pub use messages::MessagesClient;
pub use products::ProductsClient;
