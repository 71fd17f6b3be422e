use tracing::instrument;

use jikoni_core::Category;

use crate::error::ApiError;
use crate::gateway::{Access, Gateway};
use crate::models::CategoryList;

#[derive(Debug, Clone, Copy)]
pub struct CategoriesClient<'a> {
    gateway: &'a Gateway,
}

impl<'a> CategoriesClient<'a> {
    pub(crate) const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Categories the API accepts for products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the API lists a category this client
    /// does not know.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let list: CategoryList = self
            .gateway
            .get_json(Access::Public, "/api/categories")
            .await?;
        Ok(list.categories)
    }
}
