//! Routes for the CRM dashboard: insights and recommendations.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use luxthrift_core::catalog::CatalogItem;
use luxthrift_crm::application::query_handlers;
use luxthrift_crm::domain::insights::CrmInsights;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /crm/insights
#[instrument(skip(state))]
async fn get_insights(State(state): State<AppState>) -> Result<Json<CrmInsights>, ApiError> {
    let insights = query_handlers::get_insights(
        &*state.activity_repository,
        &*state.catalog,
        &*state.users,
    )
    .await?;

    Ok(Json(insights))
}

/// GET /crm/recommendations/{user_id}
#[instrument(skip(state))]
async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    let items =
        query_handlers::recommend_for(&user_id, &*state.activity_repository, &*state.catalog)
            .await?;

    info!(count = items.len(), "recommendations resolved");

    Ok(Json(items))
}

/// Returns the router for the CRM endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crm/insights", get(get_insights))
        .route("/crm/recommendations/{user_id}", get(get_recommendations))
}
