//! Catalog module - read-only snapshots of carrier products.
//!
//! Plans, content subscriptions and lifestyle brands arrive from the catalog
//! adapter with loosely typed prices. `price` is the only place where those
//! are normalized; everything past `TryFrom<Raw*>` sees whole Won.

mod items;
mod price;
mod usage;

pub use items::{
    Brand, DataTier, Plan, RawPlan, RawSubscription, Subscription, VoiceTier,
};
pub use price::{normalize_price, PriceError, RawPrice};
pub use usage::{RawUserUsage, UsagePressure, UsageSummary, UserUsage};
