//! Insight shapes and the pure joins that build them.
//!
//! Ranking happens in the store (see `ActivityRepository::count_grouped`);
//! the functions here only join ranked counts and recent events with
//! catalog and directory data. Results are recomputed in full on each call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use luxthrift_core::catalog::{CatalogItem, UserSummary};
use luxthrift_core::event::{ActivityAction, ActivityEvent, ActorId};
use luxthrift_core::repository::GroupedCount;
use serde::Serialize;
use uuid::Uuid;

/// A most-viewed product joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    /// Product id.
    pub product_id: String,
    /// Number of `view_product` events.
    pub views: u64,
    /// Catalog detail.
    pub product: CatalogItem,
}

/// A category ranked by event count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingCategory {
    /// Category name.
    pub category: String,
    /// Number of events carrying it.
    pub count: u64,
}

/// How many events an actor produced in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    /// The actor.
    pub actor: ActorId,
    /// The category.
    pub category: String,
    /// Number of events.
    pub count: u64,
}

/// Display data for the actor of a recent event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDisplay {
    /// The actor.
    #[serde(flatten)]
    pub actor: ActorId,
    /// User name, for registered users found in the directory.
    pub name: Option<String>,
    /// User email, for registered users found in the directory.
    pub email: Option<String>,
}

/// Display data for the product of a recent event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDisplay {
    /// Product id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Current price.
    pub price: f64,
    /// Primary image URL.
    pub image: Option<String>,
}

/// A recent event annotated for the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    /// Event id.
    pub event_id: Uuid,
    /// What was done.
    pub action: ActivityAction,
    /// Who did it.
    pub actor: ActorDisplay,
    /// Product detail, when the product still exists in the catalog.
    pub product: Option<ProductDisplay>,
    /// Product id as recorded, even if the product is gone.
    pub product_id: Option<String>,
    /// Category at capture time.
    pub category: Option<String>,
    /// Brand at capture time.
    pub brand: Option<String>,
    /// Free-form payload.
    pub metadata: serde_json::Value,
    /// Store-assigned timestamp.
    pub occurred_at: DateTime<Utc>,
}

/// The full CRM dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmInsights {
    /// Most viewed products.
    pub top_products: Vec<TopProduct>,
    /// Busiest categories.
    pub trending_categories: Vec<TrendingCategory>,
    /// Latest events.
    pub recent_activities: Vec<RecentActivity>,
    /// Per-actor category counts.
    pub user_preferences: Vec<UserPreference>,
}

/// Joins ranked view counts with catalog detail, keeping rank order and
/// dropping products the catalog no longer has.
#[must_use]
pub fn join_top_products(counts: Vec<GroupedCount>, items: &[CatalogItem]) -> Vec<TopProduct> {
    let by_id: HashMap<&str, &CatalogItem> = items.iter().map(|i| (i.id.as_str(), i)).collect();
    counts
        .into_iter()
        .filter_map(|row| {
            by_id.get(row.key.as_str()).map(|item| TopProduct {
                product: (*item).clone(),
                product_id: row.key,
                views: row.count,
            })
        })
        .collect()
}

/// Maps per-category counts onto the dashboard shape, keeping rank order.
#[must_use]
pub fn trending_from_counts(counts: Vec<GroupedCount>) -> Vec<TrendingCategory> {
    counts
        .into_iter()
        .map(|row| TrendingCategory {
            category: row.key,
            count: row.count,
        })
        .collect()
}

/// Maps per-`(actor, category)` counts onto the dashboard shape. Rows the
/// store returned without an actor are skipped.
#[must_use]
pub fn preferences_from_counts(counts: Vec<GroupedCount>) -> Vec<UserPreference> {
    counts
        .into_iter()
        .filter_map(|row| {
            row.actor.map(|actor| UserPreference {
                actor,
                category: row.key,
                count: row.count,
            })
        })
        .collect()
}

/// Annotates `events` with user and product display data. Events keep their
/// given order.
#[must_use]
pub fn annotate_recent(
    events: Vec<ActivityEvent>,
    users: &[UserSummary],
    products: &[CatalogItem],
) -> Vec<RecentActivity> {
    let users: HashMap<&str, &UserSummary> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    let products: HashMap<&str, &CatalogItem> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();

    events
        .into_iter()
        .map(|event| {
            let user = event.actor.user_id().and_then(|id| users.get(id));
            let actor = ActorDisplay {
                name: user.map(|u| u.name.clone()),
                email: user.and_then(|u| u.email.clone()),
                actor: event.actor,
            };
            let product = event
                .product_id
                .as_deref()
                .and_then(|id| products.get(id))
                .map(|p| ProductDisplay {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    price: p.price,
                    image: p.image.clone(),
                });

            RecentActivity {
                event_id: event.event_id,
                action: event.action,
                actor,
                product,
                product_id: event.product_id,
                category: event.category,
                brand: event.brand,
                metadata: event.metadata,
                occurred_at: event.occurred_at,
            }
        })
        .collect()
}
