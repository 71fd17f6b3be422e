//! Editable form state and its validation.
//!
//! Forms hold exactly what the user typed. Converting to a request body is
//! where text becomes typed values; anything that cannot be converted is a
//! [`FormError`] shown next to the form, and no request is made.

use thiserror::Error;

use jikoni_core::{Category, Email, EmailError, Price, PriceError};

use crate::models::{NewMessage, Product, ProductDraft};

/// Validation failures raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// A field of the product form, for change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductField {
    Name(String),
    Category(Category),
    Description(String),
    Price(String),
    Featured(bool),
    ImageUrl(String),
}

/// The create/edit product modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Raw price text; empty means "no price".
    pub price: String,
    pub featured: bool,
    pub image_url: String,
}

impl ProductForm {
    /// Form pre-filled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category,
            description: product.description.clone().unwrap_or_default(),
            price: product
                .price
                .map(|p| p.amount().normalize().to_string())
                .unwrap_or_default(),
            featured: product.featured,
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// Apply one field change.
    pub fn set(&mut self, field: ProductField) {
        match field {
            ProductField::Name(v) => self.name = v,
            ProductField::Category(v) => self.category = v,
            ProductField::Description(v) => self.description = v,
            ProductField::Price(v) => self.price = v,
            ProductField::Featured(v) => self.featured = v,
            ProductField::ImageUrl(v) => self.image_url = v,
        }
    }

    /// Request body for create or update.
    ///
    /// Blank price, description and image become `null`.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Required` for a blank name and `FormError::Price`
    /// for a price that is not a non-negative number.
    pub fn to_draft(&self) -> Result<ProductDraft, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::Required("Name"));
        }

        let price = match self.price.trim() {
            "" => None,
            text => Some(Price::parse(text)?),
        };

        Ok(ProductDraft {
            name: name.to_owned(),
            category: self.category,
            description: non_blank(&self.description),
            price,
            featured: self.featured,
            image_url: non_blank(&self.image_url),
        })
    }
}

/// The public contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    /// Validated submission.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Required` if name, email or message is blank and
    /// `FormError::Email` if the address does not parse.
    pub fn to_new_message(&self) -> Result<NewMessage, FormError> {
        let name = self.name.trim();
        let message = self.message.trim();
        if name.is_empty() {
            return Err(FormError::Required("Name"));
        }
        if self.email.trim().is_empty() {
            return Err(FormError::Required("Email"));
        }
        if message.is_empty() {
            return Err(FormError::Required("Message"));
        }

        Ok(NewMessage {
            name: name.to_owned(),
            email: Email::parse(&self.email)?,
            phone: non_blank(&self.phone),
            message: message.to_owned(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
