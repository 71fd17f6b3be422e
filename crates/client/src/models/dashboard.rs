//! Dashboard aggregates.

use serde::{Deserialize, Serialize};

use jikoni_core::{Category, MessageId, MessageStatus, ProductId, Timestamp};

/// `GET /api/dashboard/stats` response.
///
/// Recomputed by the server on every request. Counters the server does not
/// report default to zero and the recent lists default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub stats: StatsCounts,
    #[serde(default)]
    pub recent_products: Vec<ProductSummary>,
    #[serde(default)]
    pub recent_messages: Vec<MessageSummary>,
}

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsCounts {
    pub total_products: u64,
    pub total_messages: u64,
    pub new_messages: u64,
    pub featured_products: u64,
}

/// Recently added product, as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Recently received message, as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: MessageId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_partial_stats_default_to_zero() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "stats": {"total_messages": 14, "new_messages": 3}
        }))
        .unwrap();
        assert_eq!(stats.stats.total_messages, 14);
        assert_eq!(stats.stats.new_messages, 3);
        assert_eq!(stats.stats.total_products, 0);
        assert!(stats.recent_products.is_empty());
    }

    #[test]
    fn test_recent_lists() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "stats": {"total_products": 2, "featured_products": 1},
            "recent_products": [{"id": 1, "name": "Shaker Cabinets", "category": "Cabinetry"}],
            "recent_messages": [{"id": 5, "name": "Amina", "status": "read"}]
        }))
        .unwrap();
        assert_eq!(stats.recent_products[0].category, Some(Category::Cabinetry));
        assert_eq!(stats.recent_messages[0].status, MessageStatus::Read);
    }
}
