//! Captured activity before it reaches the durable store.

use chrono::{DateTime, Utc};
use luxthrift_core::event::{ActivityAction, ActorId};
use serde::{Deserialize, Serialize};

/// Header carrying the authenticated caller's user id, set by the gateway
/// in front of the ingestion endpoint.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Optional product/search context attached to a captured action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityContext {
    /// Product acted upon.
    pub product_id: Option<String>,
    /// Category copied from the product or listing.
    pub category: Option<String>,
    /// Brand copied from the product.
    pub brand: Option<String>,
    /// Free-form payload, e.g. the search query or a product name snapshot.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ActivityContext {
    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

/// An action as captured on the client: actor resolved, not yet stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySubmission {
    /// What was done.
    pub action: ActivityAction,
    /// Who did it.
    pub actor: ActorId,
    /// Product acted upon.
    pub product_id: Option<String>,
    /// Category at capture time.
    pub category: Option<String>,
    /// Brand at capture time.
    pub brand: Option<String>,
    /// Free-form payload.
    pub metadata: serde_json::Value,
    /// Client clock at capture; informational only, never used for ordering
    /// in the durable store.
    pub captured_at: DateTime<Utc>,
}

/// Body of `POST /api/activity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRequest {
    /// Action wire name.
    pub action: String,
    /// Product acted upon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Category at capture time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand at capture time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Free-form payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Anonymous guest token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
}

impl From<&ActivitySubmission> for IngestionRequest {
    fn from(submission: &ActivitySubmission) -> Self {
        Self {
            action: submission.action.as_str().to_owned(),
            product_id: submission.product_id.clone(),
            category: submission.category.clone(),
            brand: submission.brand.clone(),
            metadata: Some(submission.metadata.clone()),
            guest_id: submission.actor.guest_id().map(str::to_owned),
        }
    }
}
