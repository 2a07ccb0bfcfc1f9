//! Catalog port - read-only access to plans, subscriptions, brands and
//! subscriber usage.
//!
//! Adapters normalize prices through `domain::catalog` before returning
//! records, so every price past this port is whole Won.

use async_trait::async_trait;

use crate::domain::catalog::{Brand, Plan, PriceError, Subscription, UserUsage};
use crate::domain::foundation::UserId;

/// Port for reading the product catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// All plans, ordered by id.
    async fn list_plans(&self) -> Result<Vec<Plan>, CatalogError>;

    /// All content subscriptions, ordered by id.
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, CatalogError>;

    /// All lifestyle brands, ordered by id.
    async fn list_brands(&self) -> Result<Vec<Brand>, CatalogError>;

    /// Current usage of a subscriber, `None` for unknown users.
    async fn get_user_usage(&self, user_id: &UserId) -> Result<Option<UserUsage>, CatalogError>;
}

/// Catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Database failure.
    #[error("database error: {0}")]
    Database(String),

    /// A record carried a price that could not be normalized.
    #[error("malformed price on {item}: {source}")]
    MalformedPrice {
        /// Item the price belongs to.
        item: String,
        /// Normalization failure.
        source: PriceError,
    },
}

impl CatalogError {
    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Creates a malformed price error.
    pub fn malformed_price(item: impl Into<String>, source: PriceError) -> Self {
        Self::MalformedPrice {
            item: item.into(),
            source,
        }
    }
}
