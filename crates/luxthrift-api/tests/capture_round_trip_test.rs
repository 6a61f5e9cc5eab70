//! Drives the client-side tracker against a live server over HTTP.

mod common;

use std::sync::Arc;

use luxthrift_core::event::ActorId;
use luxthrift_core::repository::{ActivityQuery, ActivityRepository};
use luxthrift_test_support::{InMemoryActivityRepository, SequenceRng, catalog_item};
use luxthrift_tracking::application::capture::ActivityTracker;
use luxthrift_tracking::infrastructure::http_sink::HttpActivitySink;
use luxthrift_tracking::infrastructure::session::{InMemoryGuestIdStore, SessionIdentity};

async fn serve(repo: Arc<InMemoryActivityRepository>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = common::build_test_app(repo);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_tracked_actions_reach_the_store() {
    // Arrange
    let repo = Arc::new(InMemoryActivityRepository::new());
    let base_url = serve(repo.clone()).await;
    let identity = Arc::new(SessionIdentity::anonymous());
    let tracker = ActivityTracker::new(
        Arc::new(HttpActivitySink::new(&base_url).unwrap()),
        identity.clone(),
        Arc::new(InMemoryGuestIdStore::default()),
    )
    .with_rng(Box::new(SequenceRng::new(vec![10, 35, 1])));
    let bag = catalog_item("P1", "Bags", "Hermes");

    // Act
    tracker.track_product_view(&bag).await;
    assert!(tracker.track_search("bag").await.is_none());
    tracker.track_search("birkin").await;
    identity.sign_in("alice");
    tracker.track_add_to_cart(&bag).await;

    // Assert
    let stored = repo.list(&ActivityQuery::oldest_first()).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].actor, ActorId::Guest("guest_az1az1az1".into()));
    assert_eq!(stored[0].product_id.as_deref(), Some("P1"));
    assert_eq!(stored[0].brand.as_deref(), Some("Hermes"));
    assert_eq!(stored[1].metadata["query"], "birkin");
    assert_eq!(stored[2].actor, ActorId::Registered("alice".into()));
    assert_eq!(tracker.recent_activity(10).len(), 3);
}

#[tokio::test]
async fn test_blank_signed_in_id_falls_back_to_guest() {
    let repo = Arc::new(InMemoryActivityRepository::new());
    let base_url = serve(repo.clone()).await;
    let tracker = ActivityTracker::new(
        Arc::new(HttpActivitySink::new(&base_url).unwrap()),
        Arc::new(SessionIdentity::signed_in("  ")),
        Arc::new(InMemoryGuestIdStore::default()),
    );

    // A blank signed-in id falls back to a minted guest id, so the
    // submission is still accepted.
    tracker.track_search("loafers").await;

    let stored = repo.list(&ActivityQuery::newest_first()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].actor.guest_id().unwrap().starts_with("guest_"));
}
