//! PostgreSQL implementation of CatalogReader.
//!
//! Prices are selected as text and normalized through `domain::catalog`,
//! so integer and decorated columns take the same path.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{
    Brand, Plan, RawPlan, RawPrice, RawSubscription, RawUserUsage, Subscription, UserUsage,
};
use crate::domain::foundation::UserId;
use crate::ports::{CatalogError, CatalogReader};

/// PostgreSQL-backed catalog reader.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new catalog reader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type PlanRow = (
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

#[async_trait]
impl CatalogReader for PostgresCatalog {
    async fn list_plans(&self) -> Result<Vec<Plan>, CatalogError> {
        let rows: Vec<PlanRow> = sqlx::query_as(
            r#"
            SELECT id::bigint, name, price::text, data, voice, sms, speed, description
            FROM plans
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::database(format!("Failed to list plans: {}", e)))?;

        rows.into_iter()
            .map(|(id, name, price, data, voice, sms, speed, description)| {
                let raw = RawPlan {
                    id,
                    name: name.clone(),
                    price: RawPrice::Text(price),
                    data: data.unwrap_or_default(),
                    voice: voice.unwrap_or_default(),
                    sms: sms.unwrap_or_default(),
                    speed: speed.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                };
                Plan::try_from(raw).map_err(|e| CatalogError::malformed_price(name, e))
            })
            .collect()
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, CatalogError> {
        let rows: Vec<(i64, String, Option<String>, String, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id::bigint, title, category, price::text, image_url
            FROM subscriptions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::database(format!("Failed to list subscriptions: {}", e)))?;

        rows.into_iter()
            .map(|(id, title, category, price, image)| {
                let raw = RawSubscription {
                    id,
                    title: title.clone(),
                    category: category.unwrap_or_default(),
                    price: RawPrice::Text(price),
                    image: image.unwrap_or_default(),
                };
                Subscription::try_from(raw).map_err(|e| CatalogError::malformed_price(title, e))
            })
            .collect()
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, CatalogError> {
        let rows: Vec<(i64, String, Option<String>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT id::bigint, name, description, image_url
            FROM brands
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::database(format!("Failed to list brands: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, description, image)| Brand {
                id,
                name,
                description: description.unwrap_or_default(),
                image: image.unwrap_or_default(),
            })
            .collect())
    }

    async fn get_user_usage(&self, user_id: &UserId) -> Result<Option<UserUsage>, CatalogError> {
        let row: Option<(String, String, i64, i32, i32, f64)> = sqlx::query_as(
            r#"
            SELECT plan_name, plan_price::text,
                   remaining_data_mb::bigint, remaining_voice_min::int,
                   remaining_sms_count::int, usage_percent::float8
            FROM user_usage
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::database(format!("Failed to load usage: {}", e)))?;

        let Some((plan_name, price, data_mb, voice_min, sms_count, percent)) = row else {
            return Ok(None);
        };

        let raw = RawUserUsage {
            plan_name: plan_name.clone(),
            plan_price: RawPrice::Text(price),
            remaining_data_mb: data_mb.max(0) as u64,
            remaining_voice_min: voice_min.max(0) as u32,
            remaining_sms_count: sms_count.max(0) as u32,
            usage_percent: percent as f32,
        };

        UserUsage::try_from(raw)
            .map(Some)
            .map_err(|e| CatalogError::malformed_price(plan_name, e))
    }
}
