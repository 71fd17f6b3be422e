//! Domain value types shared by the client and CLI.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod timestamp;

pub use category::{Category, ParseCategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::{MessageStatus, ParseStatusError};
pub use timestamp::{Timestamp, TimestampError};
