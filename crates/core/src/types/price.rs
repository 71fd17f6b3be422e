//! Catalogue price using decimal arithmetic.
//!
//! Prices travel over the wire as plain JSON numbers (the API stores them as
//! `REAL`), but are held as [`Decimal`] on the client so that editing and
//! re-submitting a product never drifts by a rounding error.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("price must be a number: {0}")]
    NotANumber(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative product price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Parse a price typed into a form field, e.g. `"1200"` or `"49.50"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] when the trimmed text is not a
    /// decimal, and [`PriceError::Negative`] when it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_text() {
        assert_eq!(Price::parse(" 49.50 ").unwrap().amount(), Decimal::new(4950, 2));
        assert_eq!(Price::parse("0").unwrap().amount(), Decimal::ZERO);
        assert!(matches!(
            Price::parse("cheap"),
            Err(PriceError::NotANumber(s)) if s == "cheap"
        ));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price = Price::parse("1200.5").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "1200.5");
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        let price: Price = serde_json::from_str("350").unwrap();
        assert_eq!(price.to_string(), "350.00");
        assert!(serde_json::from_str::<Price>("-2.5").is_err());
    }
}
