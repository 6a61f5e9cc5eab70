//! LuxThrift API server entry point.

use std::sync::Arc;

use luxthrift_api::config::ApiConfig;
use luxthrift_api::error::AppError;
use luxthrift_api::state::AppState;
use luxthrift_api::{build_router, telemetry};
use luxthrift_event_store::{PgActivityRepository, PgCatalogRepository, PgUserDirectory};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ApiConfig::from_env()?;
    let _telemetry = telemetry::init_telemetry(&config)?;

    info!("Starting LuxThrift API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    let app_state = AppState::new(
        Arc::new(PgActivityRepository::new(pool.clone())),
        Arc::new(PgCatalogRepository::new(pool.clone())),
        Arc::new(PgUserDirectory::new(pool)),
    );

    // TODO: Replace CorsLayer::permissive() with the storefront and admin origins.
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("LuxThrift API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
