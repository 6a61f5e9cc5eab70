//! Routes for activity ingestion.

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::{Json, Router, routing::post};
use luxthrift_core::event::ActivityEvent;
use tracing::{info, instrument};
use uuid::Uuid;

use luxthrift_tracking::application::command_handlers;
use luxthrift_tracking::domain::commands;
use luxthrift_tracking::domain::submission::{IngestionRequest, USER_ID_HEADER};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller's user id, as forwarded by the auth gateway in
/// the `x-user-id` header. `None` for anonymous callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub Option<String>);

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Ok(Self(user_id))
    }
}

/// POST /activity
#[instrument(skip_all, fields(registered = caller.0.is_some()))]
async fn record_activity(
    State(state): State<AppState>,
    caller: CallerIdentity,
    payload: Result<Json<IngestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityEvent>), ApiError> {
    let Json(request) = payload?;

    let command = commands::RecordActivity {
        correlation_id: Uuid::new_v4(),
        action: request.action,
        caller_user_id: caller.0,
        guest_id: request.guest_id,
        product_id: request.product_id,
        category: request.category,
        brand: request.brand,
        metadata: request.metadata,
    };

    info!(
        correlation_id = %command.correlation_id,
        action = %command.action,
        "handling record_activity command"
    );

    let event =
        command_handlers::handle_record_activity(&command, &*state.activity_repository).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Returns the router for activity ingestion.
pub fn router() -> Router<AppState> {
    Router::new().route("/activity", post(record_activity))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use luxthrift_core::repository::ActivityRepository;
    use luxthrift_test_support::{
        FailingActivityRepository, InMemoryActivityRepository, InMemoryCatalog,
        InMemoryUserDirectory,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state_with(activity_repository: Arc<dyn ActivityRepository>) -> AppState {
        AppState::new(
            activity_repository,
            Arc::new(InMemoryCatalog::default()),
            Arc::new(InMemoryUserDirectory::default()),
        )
    }

    fn post_request(body: &str, user_id: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/activity")
            .header("content-type", "application/json");
        if let Some(user_id) = user_id {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        builder.body(Body::from(body.to_owned())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_record_activity_returns_201_with_stored_event() {
        // Arrange
        let repo = Arc::new(InMemoryActivityRepository::new());
        let app = router().with_state(app_state_with(repo.clone()));
        let body = r#"{"action":"view_product","productId":"P1","category":"Bags","brand":"Hermes","guestId":"guest_abc123def"}"#;

        // Act
        let (status, json) = send(app, post_request(body, None)).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["action"], "view_product");
        assert_eq!(json["productId"], "P1");
        assert_eq!(json["actor"]["kind"], "guest");
        assert_eq!(json["actor"]["id"], "guest_abc123def");
        assert!(json["eventId"].is_string());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_record_activity_prefers_caller_identity_over_guest_id() {
        let repo = Arc::new(InMemoryActivityRepository::new());
        let app = router().with_state(app_state_with(repo.clone()));
        let body = r#"{"action":"purchase","productId":"P2","guestId":"guest_abc123def"}"#;

        let (status, json) = send(app, post_request(body, Some("user-42"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["actor"]["kind"], "registered");
        assert_eq!(json["actor"]["id"], "user-42");
    }

    #[tokio::test]
    async fn test_record_activity_rejects_unknown_action_without_storing() {
        let repo = Arc::new(InMemoryActivityRepository::new());
        let app = router().with_state(app_state_with(repo.clone()));
        let body = r#"{"action":"wishlist","guestId":"guest_abc123def"}"#;

        let (status, json) = send(app, post_request(body, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_event_kind");
        assert!(json["message"].as_str().unwrap().contains("wishlist"));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_activity_without_actor_returns_400() {
        let repo = Arc::new(InMemoryActivityRepository::new());
        let app = router().with_state(app_state_with(repo.clone()));

        let (status, json) = send(app, post_request(r#"{"action":"search"}"#, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_record_activity_malformed_json_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(InMemoryActivityRepository::new())));

        let (status, json) = send(app, post_request("{not json", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_record_activity_missing_action_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(InMemoryActivityRepository::new())));

        let (status, _json) = send(app, post_request(r#"{"guestId":"guest_1"}"#, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_record_activity_storage_failure_returns_500() {
        let app = router().with_state(app_state_with(Arc::new(FailingActivityRepository)));
        let body = r#"{"action":"search","guestId":"guest_1","metadata":{"query":"kelly bag"}}"#;

        let (status, json) = send(app, post_request(body, None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_caller_identity_ignores_blank_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        let CallerIdentity(user_id) = CallerIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(user_id, None);
    }
}
