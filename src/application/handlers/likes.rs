//! LikesHandler - one-shot pick from services and brands the user likes.

use std::sync::Arc;

use crate::domain::recommendation::{match_subscription, mentioned_names, SubscriptionPick};
use crate::ports::{CatalogError, CatalogReader};

/// Handler for the likes-based one-shot.
pub struct LikesHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl LikesHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// Catalog names mentioned in a chat message.
    pub async fn liked_in(&self, message: &str) -> Result<Vec<String>, CatalogError> {
        let subscriptions = self.catalog.list_subscriptions().await?;
        let brands = self.catalog.list_brands().await?;
        Ok(mentioned_names(message, &subscriptions, &brands))
    }

    /// Picks a subscription and brand for the liked names.
    ///
    /// Returns `None` when nothing is liked or the catalog is empty.
    pub async fn pick(&self, liked: &[String]) -> Result<Option<SubscriptionPick>, CatalogError> {
        let liked: Vec<&str> = liked
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();
        if liked.is_empty() {
            return Ok(None);
        }

        let subscriptions = self.catalog.list_subscriptions().await?;
        let brands = self.catalog.list_brands().await?;
        Ok(match_subscription(&liked, None, &subscriptions, &brands))
    }
}
