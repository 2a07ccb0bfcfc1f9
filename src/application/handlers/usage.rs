//! UsageHandler - one-shot answers built from a subscriber's current usage.

use std::sync::Arc;

use crate::domain::catalog::{Plan, UsagePressure, UsageSummary, UserUsage};
use crate::domain::foundation::UserId;
use crate::domain::recommendation::{rank_plans, PlanPreferences, TOP_PLANS};
use crate::domain::slots::{Budget, Comparator, NeedLevel};
use crate::ports::{CatalogError, CatalogReader};

const AROUND_SLACK_WON: u32 = 5_000;
const PRICE_STEP_WON: u32 = 10_000;

/// Usage snapshot with its derived summary.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    pub usage: UserUsage,
    pub summary: UsageSummary,
}

/// Handler for the current-usage and usage-based one-shots.
pub struct UsageHandler {
    catalog: Arc<dyn CatalogReader>,
}

impl UsageHandler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// Loads the usage of `user_id`. `None` for unknown users.
    pub async fn report(&self, user_id: &UserId) -> Result<Option<UsageReport>, CatalogError> {
        let usage = self.catalog.get_user_usage(user_id).await?;
        Ok(usage.map(|usage| UsageReport {
            summary: usage.summarize(),
            usage,
        }))
    }

    /// Ranks plans against preferences derived from the report.
    ///
    /// The subscriber's current plan is never recommended back.
    pub async fn recommend(&self, report: &UsageReport) -> Result<Vec<Plan>, CatalogError> {
        let plans: Vec<Plan> = self
            .catalog
            .list_plans()
            .await?
            .into_iter()
            .filter(|plan| plan.name != report.usage.plan_name)
            .collect();

        let prefs = preferences_from_usage(report);
        Ok(rank_plans(&plans, &prefs, TOP_PLANS))
    }
}

/// Derives plan preferences from usage pressure and the current price.
pub fn preferences_from_usage(report: &UsageReport) -> PlanPreferences {
    let data_need = match report.summary.data {
        UsagePressure::Tight => NeedLevel::High,
        UsagePressure::Moderate => NeedLevel::Medium,
        UsagePressure::Relaxed => NeedLevel::Low,
    };
    let voice_need = match report.summary.voice {
        UsagePressure::Tight => NeedLevel::High,
        UsagePressure::Moderate => NeedLevel::Medium,
        UsagePressure::Relaxed => NeedLevel::Low,
    };

    let current = report.usage.plan_price;
    let target = if report.summary.suggests_upgrade {
        current.saturating_add(PRICE_STEP_WON)
    } else if report.summary.suggests_downgrade {
        current.saturating_sub(PRICE_STEP_WON)
    } else {
        current
    };

    PlanPreferences {
        budget: Budget {
            min_won: target.saturating_sub(AROUND_SLACK_WON),
            max_won: target.saturating_add(AROUND_SLACK_WON),
            comparator: Comparator::Around(target),
        },
        data_need,
        voice_need,
    }
}
