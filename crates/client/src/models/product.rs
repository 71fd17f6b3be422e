//! Catalogue products.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use jikoni_core::{Category, Price, ProductId, Timestamp};

use super::common::empty_string_as_none;

/// A catalogue product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub featured: bool,
    /// Older rows call this `image_path`.
    #[serde(default, alias = "image_path", deserialize_with = "empty_string_as_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Full product record for create, or for a full replace on update.
///
/// Every field is always serialized; an absent optional value goes out as
/// `null` so that clearing a field in the editor clears it on the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: Category,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub featured: bool,
    pub image_url: Option<String>,
}

/// Partial product update: only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductPatch {
    /// Whether the patch would change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.featured.is_none()
            && self.image_url.is_none()
    }
}

/// Filters for `GET /api/products`.
///
/// Only parameters that are set (and non-zero) reach the query string.
/// `featured` is only ever sent as `featured=true`: the API has no way to
/// ask for non-featured products, so `Some(false)` behaves like `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<Category>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub featured: Option<bool>,
}

impl ProductQuery {
    /// Request a specific page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Restrict to one category.
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Encoded query string without the leading `?`, or `None` when no
    /// filter is set.
    #[must_use]
    pub fn to_query_string(&self) -> Option<String> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut any = false;

        if let Some(category) = self.category {
            query.append_pair("category", category.as_str());
            any = true;
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            query.append_pair("page", &page.to_string());
            any = true;
        }
        if let Some(per_page) = self.per_page.filter(|p| *p > 0) {
            query.append_pair("per_page", &per_page.to_string());
            any = true;
        }
        if self.featured == Some(true) {
            query.append_pair("featured", "true");
            any = true;
        }

        any.then(|| query.finish())
    }

    /// `/api/products` with the query string appended when there is one.
    #[must_use]
    pub fn path(&self) -> String {
        match self.to_query_string() {
            Some(query) => format!("/api/products?{query}"),
            None => "/api/products".to_string(),
        }
    }
}

/// One page of `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_query_without_filters_has_no_query_string() {
        assert_eq!(ProductQuery::default().path(), "/api/products");
        let zeros = ProductQuery {
            page: Some(0),
            per_page: Some(0),
            featured: Some(false),
            ..ProductQuery::default()
        };
        assert_eq!(zeros.path(), "/api/products");
    }

    #[test]
    fn test_query_only_set_keys() {
        assert_eq!(ProductQuery::default().page(2).path(), "/api/products?page=2");
        let query = ProductQuery {
            category: Some(Category::Wardrobe),
            per_page: Some(12),
            featured: Some(true),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_query_string().unwrap(),
            "category=Wardrobe&per_page=12&featured=true"
        );
    }

    #[test]
    fn test_product_accepts_legacy_columns() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Walnut Island",
            "category": "Kitchen",
            "description": "",
            "image_path": "/uploads/island.jpg",
            "price": 185000,
            "featured": true,
            "created_at": "2025-02-11 08:00:00"
        }))
        .unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert!(product.description.is_none());
        assert_eq!(product.image_url.as_deref(), Some("/uploads/island.jpg"));
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_draft_sends_null_price() {
        let draft = ProductDraft {
            name: "Oak Wardrobe".into(),
            category: Category::Wardrobe,
            description: None,
            price: None,
            featured: false,
            image_url: None,
        };
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["price"], serde_json::Value::Null);
        assert!(body.as_object().unwrap().contains_key("price"));
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = ProductPatch {
            featured: Some(true),
            ..ProductPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"featured": true}));
        assert!(ProductPatch::default().is_empty());
    }
}
