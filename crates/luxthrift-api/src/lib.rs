//! LuxThrift API: HTTP surface for activity ingestion and CRM insights.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use crate::state::AppState;

/// Builds the application router. Transport layers (tracing, CORS) are
/// added by the binary.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest(
            "/api",
            Router::new()
                .merge(routes::activity::router())
                .merge(routes::crm::router()),
        )
        .with_state(state)
}
