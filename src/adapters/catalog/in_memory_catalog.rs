//! In-memory catalog for tests and local development.
//!
//! Records are held in their raw form and normalized on every read, the
//! same way the PostgreSQL adapter treats database rows.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::catalog::{
    Brand, Plan, RawPlan, RawPrice, RawSubscription, RawUserUsage, Subscription, UserUsage,
};
use crate::domain::foundation::UserId;
use crate::ports::{CatalogError, CatalogReader};

/// Catalog backed by in-process vectors.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    plans: Vec<RawPlan>,
    subscriptions: Vec<RawSubscription>,
    brands: Vec<Brand>,
    usage: HashMap<String, RawUserUsage>,
    unavailable: AtomicBool,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with a representative product line-up.
    pub fn sample() -> Self {
        Self::new()
            .with_plans(sample_plans())
            .with_subscriptions(sample_subscriptions())
            .with_brands(sample_brands())
            .with_usage("user-1", usage_row("5G 라이트+", "55,000원", 1_024, 420, 180, 88.0))
            .with_usage("user-2", usage_row("5G 스탠다드", "75,000원", 120_000, 9_999, 300, 12.0))
    }

    pub fn with_plans(mut self, plans: Vec<RawPlan>) -> Self {
        self.plans = plans;
        self
    }

    pub fn with_subscriptions(mut self, subscriptions: Vec<RawSubscription>) -> Self {
        self.subscriptions = subscriptions;
        self
    }

    pub fn with_brands(mut self, brands: Vec<Brand>) -> Self {
        self.brands = brands;
        self
    }

    pub fn with_usage(mut self, user_id: impl Into<String>, usage: RawUserUsage) -> Self {
        self.usage.insert(user_id.into(), usage);
        self
    }

    /// Makes every subsequent read fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::database("catalog unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn list_plans(&self) -> Result<Vec<Plan>, CatalogError> {
        self.check_available()?;
        self.plans
            .iter()
            .cloned()
            .map(|raw| {
                let name = raw.name.clone();
                Plan::try_from(raw).map_err(|e| CatalogError::malformed_price(name, e))
            })
            .collect()
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, CatalogError> {
        self.check_available()?;
        self.subscriptions
            .iter()
            .cloned()
            .map(|raw| {
                let title = raw.title.clone();
                Subscription::try_from(raw).map_err(|e| CatalogError::malformed_price(title, e))
            })
            .collect()
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, CatalogError> {
        self.check_available()?;
        Ok(self.brands.clone())
    }

    async fn get_user_usage(&self, user_id: &UserId) -> Result<Option<UserUsage>, CatalogError> {
        self.check_available()?;
        let Some(raw) = self.usage.get(user_id.as_str()).cloned() else {
            return Ok(None);
        };
        let plan_name = raw.plan_name.clone();
        UserUsage::try_from(raw)
            .map(Some)
            .map_err(|e| CatalogError::malformed_price(plan_name, e))
    }
}

fn plan_row(id: i64, name: &str, price: RawPrice, data: &str, voice: &str) -> RawPlan {
    RawPlan {
        id,
        name: name.to_string(),
        price,
        data: data.to_string(),
        voice: voice.to_string(),
        sms: "기본제공".to_string(),
        speed: if name.starts_with("LTE") { "LTE" } else { "5G" }.to_string(),
        description: String::new(),
    }
}

fn sample_plans() -> Vec<RawPlan> {
    const UNLIMITED_VOICE: &str = "집/이동전화 무제한";
    vec![
        plan_row(1, "5G 프리미어 에센셜", RawPrice::Won(85_000), "무제한", UNLIMITED_VOICE),
        plan_row(2, "5G 스탠다드", "75,000원".into(), "150GB+5Mbps", UNLIMITED_VOICE),
        plan_row(3, "5G 데이터 레귤러", RawPrice::Won(63_000), "50GB+1Mbps", UNLIMITED_VOICE),
        plan_row(4, "5G 심플+", "61,000원".into(), "31GB+1Mbps", UNLIMITED_VOICE),
        plan_row(5, "5G 라이트+", RawPrice::Won(55_000), "14GB+1Mbps", UNLIMITED_VOICE),
        plan_row(6, "5G 슬림+", "47,000원".into(), "9GB+400kbps", UNLIMITED_VOICE),
        plan_row(7, "LTE 다이렉트 45", RawPrice::Won(45_000), "15GB+3Mbps", UNLIMITED_VOICE),
        plan_row(8, "5G 미니", "3만7천원".into(), "5GB+400kbps", UNLIMITED_VOICE),
        plan_row(9, "LTE 데이터 33", "월 33,000".into(), "2GB", "300분"),
        plan_row(10, "5G 시그니처", RawPrice::Won(130_000), "무제한", UNLIMITED_VOICE),
    ]
}

fn subscription_row(id: i64, title: &str, category: &str, price: RawPrice) -> RawSubscription {
    RawSubscription {
        id,
        title: title.to_string(),
        category: category.to_string(),
        price,
        image: format!("/images/subscriptions/{}.png", id),
    }
}

fn sample_subscriptions() -> Vec<RawSubscription> {
    vec![
        subscription_row(1, "넷플릭스", "video", "13,500원".into()),
        subscription_row(2, "티빙", "video", RawPrice::Won(10_900)),
        subscription_row(3, "디즈니+", "video", "9,900원".into()),
        subscription_row(4, "유튜브 프리미엄", "video", RawPrice::Won(14_900)),
        subscription_row(5, "지니뮤직", "music", RawPrice::Won(7_400)),
        subscription_row(6, "멜론", "music", "10,900원".into()),
        subscription_row(7, "밀리의 서재", "ebook", "9,900원".into()),
    ]
}

fn brand(id: i64, name: &str, description: &str) -> Brand {
    Brand {
        id,
        name: name.to_string(),
        description: description.to_string(),
        image: format!("/images/brands/{}.png", id),
    }
}

fn sample_brands() -> Vec<Brand> {
    vec![
        brand(1, "CGV", "영화 관람권 할인"),
        brand(2, "스타벅스", "커피 음료 쿠폰"),
        brand(3, "교보문고", "도서 구매 할인"),
        brand(4, "배스킨라빈스", "아이스크림 디저트 쿠폰"),
        brand(5, "파리바게뜨", "베이커리 할인"),
        brand(6, "GS25", "편의점 상품 할인"),
        brand(7, "올리브영", "뷰티 상품 할인"),
    ]
}

fn usage_row(
    plan_name: &str,
    price: &str,
    data_mb: u64,
    voice_min: u32,
    sms: u32,
    percent: f32,
) -> RawUserUsage {
    RawUserUsage {
        plan_name: plan_name.to_string(),
        plan_price: price.into(),
        remaining_data_mb: data_mb,
        remaining_voice_min: voice_min,
        remaining_sms_count: sms,
        usage_percent: percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{DataTier, PriceError};
    use crate::domain::recommendation::{rank_plans, PlanPreferences, TOP_PLANS};
    use std::collections::BTreeMap;

    fn slots(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn sample_prices_are_normalized_on_read() {
        let catalog = InMemoryCatalog::sample();
        let plans = catalog.list_plans().await.unwrap();

        let mini = plans.iter().find(|p| p.name == "5G 미니").unwrap();
        assert_eq!(mini.monthly_price_won, 37_000);
        let lte = plans.iter().find(|p| p.name == "LTE 데이터 33").unwrap();
        assert_eq!(lte.monthly_price_won, 33_000);
    }

    #[tokio::test]
    async fn malformed_price_surfaces_item_name() {
        let catalog = InMemoryCatalog::new().with_plans(vec![plan_row(
            1,
            "깨진 요금제",
            RawPrice::Won(-10),
            "1GB",
            "",
        )]);

        let err = catalog.list_plans().await.unwrap_err();
        match err {
            CatalogError::MalformedPrice { item, source } => {
                assert_eq!(item, "깨진 요금제");
                assert_eq!(source, PriceError::Negative(-10));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unavailable_catalog_fails_reads() {
        let catalog = InMemoryCatalog::sample();
        catalog.set_unavailable(true);
        assert!(matches!(
            catalog.list_brands().await,
            Err(CatalogError::Database(_))
        ));
        catalog.set_unavailable(false);
        assert_eq!(catalog.list_brands().await.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn unknown_user_has_no_usage() {
        let catalog = InMemoryCatalog::sample();
        let usage = catalog
            .get_user_usage(&UserId::new("nobody").unwrap())
            .await
            .unwrap();
        assert!(usage.is_none());

        let known = catalog
            .get_user_usage(&UserId::new("user-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(known.plan_price, 55_000);
    }

    #[tokio::test]
    async fn capped_budget_heavy_user_gets_high_data_plan_first() {
        let plans = InMemoryCatalog::sample().list_plans().await.unwrap();
        let prefs = PlanPreferences::from_slots(&slots(&[
            ("data_usage", "무제한"),
            ("call_usage", "많이 해요"),
            ("services", "유튜브"),
            ("budget", "5만원 이하"),
        ]));

        let ranked = rank_plans(&plans, &prefs, TOP_PLANS);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["LTE 다이렉트 45", "5G 슬림+"]);
        assert!(ranked.iter().all(|p| p.monthly_price_won <= 50_000));
        assert!(ranked[0].data_tier() >= DataTier::High);
    }

    #[tokio::test]
    async fn at_least_budget_prefers_cheaper_of_tied_plans() {
        let plans = InMemoryCatalog::sample().list_plans().await.unwrap();
        let prefs = PlanPreferences::from_slots(&slots(&[
            ("data_usage", "보통"),
            ("call_usage", "보통"),
            ("services", "없어요"),
            ("budget", "5만원 이상"),
        ]));

        let ranked = rank_plans(&plans, &prefs, TOP_PLANS);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["5G 심플+", "5G 데이터 레귤러"]);
        assert!(ranked
            .iter()
            .all(|p| (50_000..=80_000).contains(&p.monthly_price_won)));
    }
}
