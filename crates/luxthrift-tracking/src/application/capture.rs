//! Client-side activity capture.
//!
//! `ActivityTracker` turns a user action into an `ActivitySubmission`,
//! writes it to the bounded local mirror and hands it to an `ActivitySink`.
//! Capture is best-effort telemetry: sink failures are logged and dropped,
//! never returned to the caller, and the mirror is written whether or not
//! the sink succeeds.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use luxthrift_core::catalog::CatalogItem;
use luxthrift_core::clock::{Clock, SystemClock};
use luxthrift_core::error::DomainError;
use luxthrift_core::event::{ActivityAction, ActorId, normalize_descriptor};
use luxthrift_core::rng::{DeterministicRng, SystemRng};
use tracing::{debug, warn};

use crate::domain::guest::generate_guest_id;
use crate::domain::mirror::{ActivityMirror, DEFAULT_MIRROR_CAPACITY, MirrorSummary};
use crate::domain::submission::{ActivityContext, ActivitySubmission};

/// Search queries shorter than this are not recorded.
pub const MIN_SEARCH_QUERY_LEN: usize = 4;

/// Resolves the signed-in user for the current session.
pub trait IdentityProvider: Send + Sync {
    /// The registered user id, or `None` for anonymous visitors.
    fn current_user_id(&self) -> Option<String>;
}

/// Persists the anonymous guest id across captures.
pub trait GuestIdStore: Send + Sync {
    /// Returns the stored guest id, if one was minted before.
    fn load(&self) -> Option<String>;

    /// Stores `guest_id` for reuse.
    fn save(&self, guest_id: &str);
}

/// Destination for captured activity, typically the ingestion endpoint.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    /// Delivers one submission.
    async fn submit(&self, submission: &ActivitySubmission) -> Result<(), DomainError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Captures storefront actions for one browser session.
pub struct ActivityTracker {
    sink: Arc<dyn ActivitySink>,
    identity: Arc<dyn IdentityProvider>,
    guest_ids: Arc<dyn GuestIdStore>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn DeterministicRng>>,
    mirror: Mutex<ActivityMirror>,
}

impl std::fmt::Debug for ActivityTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityTracker")
            .field("mirror", &self.mirror)
            .finish_non_exhaustive()
    }
}

impl ActivityTracker {
    /// Creates a tracker with the system clock, an OS-seeded RNG and a
    /// mirror of the default capacity.
    #[must_use]
    pub fn new(
        sink: Arc<dyn ActivitySink>,
        identity: Arc<dyn IdentityProvider>,
        guest_ids: Arc<dyn GuestIdStore>,
    ) -> Self {
        Self {
            sink,
            identity,
            guest_ids,
            clock: Arc::new(SystemClock),
            rng: Mutex::new(Box::new(SystemRng::new())),
            mirror: Mutex::new(ActivityMirror::new(DEFAULT_MIRROR_CAPACITY)),
        }
    }

    /// Replaces the capture clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the RNG used to mint guest ids.
    #[must_use]
    pub fn with_rng(mut self, rng: Box<dyn DeterministicRng>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Replaces the mirror with an empty one of `capacity`.
    #[must_use]
    pub fn with_mirror_capacity(mut self, capacity: usize) -> Self {
        self.mirror = Mutex::new(ActivityMirror::new(capacity));
        self
    }

    /// Registered user if signed in, otherwise the persisted guest id,
    /// minting and saving one on first use.
    fn resolve_actor(&self) -> ActorId {
        if let Some(user_id) = normalize_descriptor(self.identity.current_user_id()) {
            return ActorId::Registered(user_id);
        }
        // Held across load, mint and save: concurrent first captures must
        // agree on a single guest id.
        let mut rng = lock(&self.rng);
        if let Some(guest_id) = normalize_descriptor(self.guest_ids.load()) {
            return ActorId::Guest(guest_id);
        }
        let guest_id = generate_guest_id(&mut **rng);
        self.guest_ids.save(&guest_id);
        drop(rng);
        debug!(%guest_id, "minted guest id");
        ActorId::Guest(guest_id)
    }

    /// Records `action` with `context`. Returns the submission that was
    /// mirrored and handed to the sink.
    pub async fn record(&self, action: ActivityAction, context: ActivityContext) -> ActivitySubmission {
        let submission = ActivitySubmission {
            action,
            actor: self.resolve_actor(),
            product_id: normalize_descriptor(context.product_id),
            category: normalize_descriptor(context.category),
            brand: normalize_descriptor(context.brand),
            metadata: serde_json::Value::Object(context.metadata),
            captured_at: self.clock.now(),
        };

        lock(&self.mirror).put(submission.clone());

        if let Err(err) = self.sink.submit(&submission).await {
            warn!(error = %err, %action, "activity submission dropped");
        }

        submission
    }

    /// Records a product detail view.
    pub async fn track_product_view(&self, product: &CatalogItem) -> ActivitySubmission {
        self.record(ActivityAction::ViewProduct, product_context(product))
            .await
    }

    /// Records an add-to-cart.
    pub async fn track_add_to_cart(&self, product: &CatalogItem) -> ActivitySubmission {
        self.record(ActivityAction::AddToCart, product_context(product))
            .await
    }

    /// Records a trimmed search query, skipping queries shorter than
    /// [`MIN_SEARCH_QUERY_LEN`] characters.
    pub async fn track_search(&self, query: &str) -> Option<ActivitySubmission> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return None;
        }
        let context = ActivityContext::default().with_metadata("query", query);
        Some(self.record(ActivityAction::Search, context).await)
    }

    /// Mirrored submissions, newest first.
    #[must_use]
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivitySubmission> {
        lock(&self.mirror).recent(limit)
    }

    /// Session statistics over the mirror.
    #[must_use]
    pub fn mirror_summary(&self) -> MirrorSummary {
        lock(&self.mirror).summary()
    }
}

fn product_context(product: &CatalogItem) -> ActivityContext {
    ActivityContext {
        product_id: Some(product.id.clone()),
        category: Some(product.category.clone()),
        brand: Some(product.brand.clone()),
        metadata: serde_json::Map::new(),
    }
    .with_metadata("productName", product.name.as_str())
}
