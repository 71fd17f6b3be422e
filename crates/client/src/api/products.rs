//! Product catalogue endpoints.

use reqwest::Method;
use tracing::instrument;

use jikoni_core::ProductId;

use crate::error::ApiError;
use crate::gateway::{Access, Gateway};
use crate::models::{Ack, Product, ProductDraft, ProductPage, ProductPatch, ProductQuery, Saved};

/// Catalogue reads are public; writes need the admin token.
#[derive(Debug, Clone, Copy)]
pub struct ProductsClient<'a> {
    gateway: &'a Gateway,
}

impl<'a> ProductsClient<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// One page of products. Unset query fields are left out of the URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is not a page.
    #[instrument(skip(self))]
    pub async fn list(&self, query: ProductQuery) -> Result<ProductPage, ApiError> {
        self.gateway.get_json(Access::Public, &query.path()).await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if no such product exists.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        let body: serde_json::Value = self
            .gateway
            .get_json(Access::Public, &format!("/api/products/{id}"))
            .await?;
        Saved::from_body(body, "product")?.require("product")
    }

    /// Create a product from a full draft.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token was rejected and
    /// `ApiError::Api` for validation failures.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Saved<Product>, ApiError> {
        let body = self
            .gateway
            .send_json(Access::Bearer, Method::POST, "/api/products", draft)
            .await?;
        Saved::from_body(body, "product")
    }

    /// Replace every editable field of a product.
    ///
    /// # Errors
    ///
    /// As [`ProductsClient::create`].
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Saved<Product>, ApiError> {
        let body = self
            .gateway
            .send_json(
                Access::Bearer,
                Method::PUT,
                &format!("/api/products/{id}"),
                draft,
            )
            .await?;
        Saved::from_body(body, "product")
    }

    /// Send only the fields set in `patch`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` for an empty patch, otherwise as
    /// [`ProductsClient::create`].
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn patch(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Saved<Product>, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::Request("nothing to update".into()));
        }
        let body = self
            .gateway
            .send_json(
                Access::Bearer,
                Method::PUT,
                &format!("/api/products/{id}"),
                patch,
            )
            .await?;
        Saved::from_body(body, "product")
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// As [`ProductsClient::create`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<Ack, ApiError> {
        let body = self.gateway.delete(&format!("/api/products/{id}")).await?;
        Ok(Ack::from_body(&body))
    }
}
