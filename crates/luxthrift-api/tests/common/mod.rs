//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use luxthrift_core::catalog::{CatalogItem, UserSummary};
use luxthrift_core::repository::ActivityRepository;
use luxthrift_event_store::{PgActivityRepository, PgCatalogRepository, PgUserDirectory};
use luxthrift_test_support::{InMemoryCatalog, InMemoryUserDirectory, catalog_item};
use sqlx::PgPool;
use tower::ServiceExt;

use luxthrift_api::build_router;
use luxthrift_api::state::AppState;

/// The catalog every in-memory test app is built with.
pub fn test_catalog() -> Vec<CatalogItem> {
    vec![
        catalog_item("P1", "Bags", "Hermes"),
        catalog_item("P2", "Shoes", "Gucci"),
        catalog_item("P3", "Bags", "Chanel"),
        catalog_item("P4", "Coats", "Hermes"),
        catalog_item("P5", "Bags", "Prada"),
        catalog_item("P6", "Bags", "Dior"),
    ]
}

/// The users every in-memory test app is built with.
pub fn test_users() -> Vec<UserSummary> {
    vec![UserSummary {
        id: "alice".into(),
        name: "Alice Martin".into(),
        email: Some("alice@example.com".into()),
    }]
}

/// Build the full app router over `repo` with the in-memory catalog and
/// user directory. Uses the same route structure as `main.rs`.
pub fn build_test_app(repo: Arc<dyn ActivityRepository>) -> Router {
    build_router(AppState::new(
        repo,
        Arc::new(InMemoryCatalog::new(test_catalog())),
        Arc::new(InMemoryUserDirectory::new(test_users())),
    ))
}

/// Build the full app router backed by Postgres.
pub fn build_pg_test_app(pool: PgPool) -> Router {
    build_router(AppState::new(
        Arc::new(PgActivityRepository::new(pool.clone())),
        Arc::new(PgCatalogRepository::new(pool.clone())),
        Arc::new(PgUserDirectory::new(pool)),
    ))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
