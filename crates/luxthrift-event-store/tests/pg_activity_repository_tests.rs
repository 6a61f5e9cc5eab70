//! Integration tests for the PostgreSQL repositories.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL`
//! and applies the workspace migrations.

use luxthrift_core::catalog::{CatalogRepository, UserDirectory};
use luxthrift_core::error::DomainError;
use luxthrift_core::event::{ActivityAction, ActorId, NewActivity};
use luxthrift_core::repository::{
    ActivityFilter, ActivityQuery, ActivityRepository, CountQuery, GroupKey, GroupedCount,
};
use luxthrift_event_store::{PgActivityRepository, PgCatalogRepository, PgUserDirectory};
use sqlx::PgPool;

/// Helper to build a `NewActivity` with sensible defaults.
fn make_activity(actor: ActorId, action: ActivityAction) -> NewActivity {
    NewActivity {
        actor,
        action,
        product_id: Some("P1".to_string()),
        category: Some("Bags".to_string()),
        brand: Some("Hermes".to_string()),
        metadata: serde_json::json!({ "productName": "Birkin" }),
    }
}

fn guest(id: &str) -> ActorId {
    ActorId::Guest(id.to_string())
}

// --- append ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_append_assigns_store_fields(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);

    let stored = repo
        .append(make_activity(guest("guest_a"), ActivityAction::ViewProduct))
        .await
        .unwrap();

    assert!(stored.sequence > 0);
    assert_eq!(stored.actor, guest("guest_a"));
    assert_eq!(stored.action, ActivityAction::ViewProduct);
    assert_eq!(stored.product_id.as_deref(), Some("P1"));
    assert_eq!(stored.metadata["productName"], "Birkin");
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_append_registered_actor_round_trip(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);
    let actor = ActorId::Registered("user-1".to_string());

    repo.append(make_activity(actor.clone(), ActivityAction::Purchase))
        .await
        .unwrap();

    let loaded = repo.list(&ActivityQuery::newest_first()).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].actor, actor);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_action_check_constraint_rejects_unknown_kind(pool: PgPool) {
    let repo = PgActivityRepository::new(pool.clone());

    // Bypass the typed API to prove the table enforces the closed set too.
    let result = sqlx::query(
        "INSERT INTO activity_events (event_id, guest_id, action) VALUES ($1, 'g', 'wishlist')",
    )
    .bind(uuid::Uuid::now_v7())
    .execute(&pool)
    .await;

    assert!(result.is_err());
    assert_eq!(repo.count().await.unwrap(), 0);
}

// --- ordering ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_orders_by_store_time(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);
    for action in [ActivityAction::Search, ActivityAction::AddToCart, ActivityAction::Purchase] {
        repo.append(make_activity(guest("guest_a"), action)).await.unwrap();
    }

    let newest = repo
        .list(&ActivityQuery::newest_first().with_limit(2))
        .await
        .unwrap();
    let oldest = repo.list(&ActivityQuery::oldest_first()).await.unwrap();

    assert_eq!(newest.len(), 2);
    assert_eq!(newest[0].action, ActivityAction::Purchase);
    assert_eq!(newest[1].action, ActivityAction::AddToCart);
    assert_eq!(oldest[0].action, ActivityAction::Search);
    assert!(oldest.windows(2).all(|w| w[0].sequence < w[1].sequence));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_appends_from_different_guests(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);

    let (a, b) = tokio::join!(
        repo.append(make_activity(guest("guest_a"), ActivityAction::ViewProduct)),
        repo.append(make_activity(guest("guest_b"), ActivityAction::ViewProduct)),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    let listed = repo.list(&ActivityQuery::oldest_first()).await.unwrap();
    assert_eq!(listed.len(), 2);
    let (first, second) = if a.sequence < b.sequence { (a, b) } else { (b, a) };
    assert_eq!(listed[0].event_id, first.event_id);
    assert_eq!(listed[1].event_id, second.event_id);
}

// --- filtering ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_filters_by_actor_and_action(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);
    let user = ActorId::Registered("user-1".to_string());
    repo.append(make_activity(user.clone(), ActivityAction::ViewProduct)).await.unwrap();
    repo.append(make_activity(user.clone(), ActivityAction::Search)).await.unwrap();
    repo.append(make_activity(guest("guest_a"), ActivityAction::ViewProduct)).await.unwrap();

    let listed = repo
        .list(&ActivityQuery::oldest_first().with_filter(ActivityFilter {
            action: Some(ActivityAction::ViewProduct),
            actor: Some(user.clone()),
            ..ActivityFilter::default()
        }))
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].actor, user);
}

// --- grouped counts ---

fn view(actor: ActorId, product_id: &str, category: &str) -> NewActivity {
    NewActivity {
        product_id: Some(product_id.to_string()),
        category: Some(category.to_string()),
        ..make_activity(actor, ActivityAction::ViewProduct)
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_count_grouped_ranks_products_with_first_seen_ties(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);
    for (product_id, category) in [
        ("P3", "Coats"),
        ("P2", "Shoes"),
        ("P1", "Bags"),
        ("P2", "Shoes"),
        ("P1", "Bags"),
        ("P4", "Bags"),
    ] {
        repo.append(view(guest("guest_a"), product_id, category)).await.unwrap();
    }
    repo.append(make_activity(guest("guest_a"), ActivityAction::AddToCart))
        .await
        .unwrap();

    let counts = repo
        .count_grouped(
            &CountQuery::new(GroupKey::Product)
                .with_filter(ActivityFilter {
                    action: Some(ActivityAction::ViewProduct),
                    ..ActivityFilter::default()
                })
                .with_limit(3),
        )
        .await
        .unwrap();

    let ranked: Vec<_> = counts.iter().map(|c| (c.key.as_str(), c.count)).collect();
    assert_eq!(ranked, vec![("P2", 2), ("P1", 2), ("P3", 1)]);
    assert!(counts.iter().all(|c| c.actor.is_none()));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_count_grouped_by_actor_and_category_skips_uncategorised(pool: PgPool) {
    let repo = PgActivityRepository::new(pool);
    let user = ActorId::Registered("user-1".to_string());
    repo.append(view(user.clone(), "P1", "Bags")).await.unwrap();
    repo.append(view(guest("guest_a"), "P2", "Shoes")).await.unwrap();
    repo.append(view(user.clone(), "P2", "Shoes")).await.unwrap();
    repo.append(view(user.clone(), "P3", "Shoes")).await.unwrap();
    repo.append(NewActivity {
        product_id: None,
        category: None,
        brand: None,
        ..make_activity(user.clone(), ActivityAction::Search)
    })
    .await
    .unwrap();

    let counts = repo
        .count_grouped(&CountQuery::new(GroupKey::ActorCategory))
        .await
        .unwrap();

    assert_eq!(
        counts,
        vec![
            GroupedCount { actor: Some(user.clone()), key: "Shoes".into(), count: 2 },
            GroupedCount { actor: Some(user), key: "Bags".into(), count: 1 },
            GroupedCount { actor: Some(guest("guest_a")), key: "Shoes".into(), count: 1 },
        ]
    );
}

// --- error mapping ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_closed_pool_maps_to_infrastructure_error(pool: PgPool) {
    let repo = PgActivityRepository::new(pool.clone());
    pool.close().await;

    match repo.count().await {
        Err(DomainError::Infrastructure(_)) => {}
        other => panic!("expected Infrastructure, got {other:?}"),
    }
}

// --- catalog ---

async fn seed_catalog(pool: &PgPool) {
    for (id, category, brand) in [
        ("P1", "Bags", "Hermes"),
        ("P2", "Shoes", "Gucci"),
        ("P3", "Bags", "Prada"),
        ("P4", "Dresses", "Hermes"),
    ] {
        sqlx::query(
            "INSERT INTO products (id, name, brand, category, price) VALUES ($1, $2, $3, $4, 10.0)",
        )
        .bind(id)
        .bind(format!("Item {id}"))
        .bind(brand)
        .bind(category)
        .execute(pool)
        .await
        .unwrap();
    }
    sqlx::query("INSERT INTO users (id, name, email) VALUES ('user-1', 'Ada', 'ada@example.com')")
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_catalog_find_matching_uses_category_or_brand(pool: PgPool) {
    seed_catalog(&pool).await;
    let catalog = PgCatalogRepository::new(pool);

    let items = catalog
        .find_matching(Some("Bags"), Some("Hermes"), 4)
        .await
        .unwrap();
    let mut ids: Vec<_> = items.into_iter().map(|i| i.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["P1", "P3", "P4"]);

    assert!(catalog.find_matching(None, None, 4).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_catalog_and_users_find_by_ids_skip_unknown(pool: PgPool) {
    seed_catalog(&pool).await;
    let catalog = PgCatalogRepository::new(pool.clone());
    let users = PgUserDirectory::new(pool);

    let items = catalog
        .find_by_ids(&["P2".to_string(), "missing".to_string()])
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].category, "Shoes");

    let found = users
        .find_by_ids(&["user-1".to_string(), "ghost".to_string()])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email.as_deref(), Some("ada@example.com"));
}
