//! Query handlers for the CRM context.
//!
//! Rankings are grouped and counted inside the activity store; handlers
//! only join the ranked rows with catalog and directory data. Nothing is
//! cached and nothing is written, so handlers may run concurrently without
//! coordination.

use luxthrift_core::catalog::{CatalogItem, CatalogRepository, UserDirectory};
use luxthrift_core::error::DomainError;
use luxthrift_core::event::{ActivityAction, ActorId};
use luxthrift_core::repository::{
    ActivityFilter, ActivityQuery, ActivityRepository, CountQuery, GroupKey,
};
use tracing::{error, info, instrument};

use crate::domain::favorites::Favorites;
use crate::domain::insights::{
    self, CrmInsights, RecentActivity, TopProduct, TrendingCategory, UserPreference,
};

/// Number of products in the top-products ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Number of categories in the trending ranking.
pub const TRENDING_CATEGORIES_LIMIT: usize = 5;

/// Number of events in the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Maximum number of recommended products.
pub const RECOMMENDATION_LIMIT: usize = 4;

/// Most viewed products, joined with catalog detail.
///
/// # Errors
///
/// Returns `DomainError` if the store or the catalog fails.
pub async fn get_top_products(
    repo: &dyn ActivityRepository,
    catalog: &dyn CatalogRepository,
) -> Result<Vec<TopProduct>, DomainError> {
    let counts = repo
        .count_grouped(
            &CountQuery::new(GroupKey::Product)
                .with_filter(ActivityFilter {
                    action: Some(ActivityAction::ViewProduct),
                    ..ActivityFilter::default()
                })
                .with_limit(TOP_PRODUCTS_LIMIT),
        )
        .await?;

    let ids: Vec<String> = counts.iter().map(|row| row.key.clone()).collect();
    let items = catalog.find_by_ids(&ids).await?;

    Ok(insights::join_top_products(counts, &items))
}

/// Busiest categories across all events.
///
/// # Errors
///
/// Returns `DomainError` if the store fails.
pub async fn get_trending_categories(
    repo: &dyn ActivityRepository,
) -> Result<Vec<TrendingCategory>, DomainError> {
    let counts = repo
        .count_grouped(
            &CountQuery::new(GroupKey::Category).with_limit(TRENDING_CATEGORIES_LIMIT),
        )
        .await?;

    Ok(insights::trending_from_counts(counts))
}

/// Latest events, annotated with user and product display data.
///
/// # Errors
///
/// Returns `DomainError` if the store, the catalog or the user directory
/// fails.
pub async fn get_recent_activity(
    repo: &dyn ActivityRepository,
    catalog: &dyn CatalogRepository,
    users: &dyn UserDirectory,
) -> Result<Vec<RecentActivity>, DomainError> {
    let events = repo
        .list(&ActivityQuery::newest_first().with_limit(RECENT_ACTIVITY_LIMIT))
        .await?;

    let mut user_ids: Vec<String> = events
        .iter()
        .filter_map(|e| e.actor.user_id().map(str::to_owned))
        .collect();
    user_ids.sort();
    user_ids.dedup();

    let mut product_ids: Vec<String> = events.iter().filter_map(|e| e.product_id.clone()).collect();
    product_ids.sort();
    product_ids.dedup();

    let (user_rows, product_rows) = tokio::try_join!(
        users.find_by_ids(&user_ids),
        catalog.find_by_ids(&product_ids),
    )?;

    Ok(insights::annotate_recent(events, &user_rows, &product_rows))
}

/// Per-actor category counts, the raw substrate for recommendations.
///
/// # Errors
///
/// Returns `DomainError` if the store fails.
pub async fn get_user_preferences(
    repo: &dyn ActivityRepository,
) -> Result<Vec<UserPreference>, DomainError> {
    let counts = repo
        .count_grouped(&CountQuery::new(GroupKey::ActorCategory))
        .await?;

    Ok(insights::preferences_from_counts(counts))
}

/// Runs all four insight queries concurrently.
///
/// The result is all-or-nothing: if any query fails the whole request fails
/// with `DomainError::Aggregation` and no partial insights are returned.
///
/// # Errors
///
/// Returns `DomainError::Aggregation` wrapping the first failure.
#[instrument(skip_all)]
pub async fn get_insights(
    repo: &dyn ActivityRepository,
    catalog: &dyn CatalogRepository,
    users: &dyn UserDirectory,
) -> Result<CrmInsights, DomainError> {
    let result = tokio::try_join!(
        get_top_products(repo, catalog),
        get_trending_categories(repo),
        get_recent_activity(repo, catalog, users),
        get_user_preferences(repo),
    );

    match result {
        Ok((top_products, trending_categories, recent_activities, user_preferences)) => {
            info!(
                top_products = top_products.len(),
                trending_categories = trending_categories.len(),
                recent_activities = recent_activities.len(),
                user_preferences = user_preferences.len(),
                "crm insights computed"
            );
            Ok(CrmInsights {
                top_products,
                trending_categories,
                recent_activities,
                user_preferences,
            })
        }
        Err(err) => {
            error!(error = %err, "crm insights failed");
            Err(DomainError::Aggregation(err.to_string()))
        }
    }
}

/// Recommends up to four catalog items for a registered user: items in the
/// user's favorite category or by their favorite brand.
///
/// A user with no history, or whose history carries no category and no
/// brand, gets an empty list.
///
/// # Errors
///
/// Returns `DomainError` if the store or the catalog fails.
#[instrument(skip(repo, catalog))]
pub async fn recommend_for(
    user_id: &str,
    repo: &dyn ActivityRepository,
    catalog: &dyn CatalogRepository,
) -> Result<Vec<CatalogItem>, DomainError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Ok(Vec::new());
    }

    let history = repo
        .list(&ActivityQuery::oldest_first().with_filter(ActivityFilter {
            actor: Some(ActorId::Registered(user_id.to_owned())),
            ..ActivityFilter::default()
        }))
        .await?;

    let favorites = Favorites::first_seen(&history);
    if favorites.is_empty() {
        return Ok(Vec::new());
    }

    catalog
        .find_matching(
            favorites.category.as_deref(),
            favorites.brand.as_deref(),
            RECOMMENDATION_LIMIT,
        )
        .await
}
