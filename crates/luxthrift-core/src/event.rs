//! Activity event model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The closed set of tracked user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// A product detail was viewed.
    ViewProduct,
    /// A product was added to the cart.
    AddToCart,
    /// A catalog search was run.
    Search,
    /// A purchase was completed.
    Purchase,
    /// A category listing was viewed.
    ViewCategory,
}

impl ActivityAction {
    /// Every accepted action, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::ViewProduct,
        Self::AddToCart,
        Self::Search,
        Self::Purchase,
        Self::ViewCategory,
    ];

    /// Returns the wire name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewProduct => "view_product",
            Self::AddToCart => "add_to_cart",
            Self::Search => "search",
            Self::Purchase => "purchase",
            Self::ViewCategory => "view_category",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::InvalidEventKind(s.to_owned()))
    }
}

/// Who performed an action: a registered user or an anonymous guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActorId {
    /// A registered user, by user id.
    Registered(String),
    /// An anonymous visitor, by client-generated guest token.
    Guest(String),
}

impl ActorId {
    /// Returns the raw identifier regardless of actor kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registered(id) | Self::Guest(id) => id,
        }
    }

    /// Returns the registered user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Registered(id) => Some(id),
            Self::Guest(_) => None,
        }
    }

    /// Returns the guest id, if any.
    #[must_use]
    pub fn guest_id(&self) -> Option<&str> {
        match self {
            Self::Registered(_) => None,
            Self::Guest(id) => Some(id),
        }
    }
}

/// An activity that has been validated but not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    /// Who performed the action.
    pub actor: ActorId,
    /// What was done.
    pub action: ActivityAction,
    /// Weak reference to the catalog item acted upon.
    pub product_id: Option<String>,
    /// Category captured at the time of the action.
    pub category: Option<String>,
    /// Brand captured at the time of the action.
    pub brand: Option<String>,
    /// Free-form key/value payload, always a JSON object.
    pub metadata: serde_json::Value,
}

/// A stored, immutable activity event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Store-assigned insertion number.
    pub sequence: i64,
    /// Who performed the action.
    pub actor: ActorId,
    /// What was done.
    pub action: ActivityAction,
    /// Weak reference to the catalog item acted upon.
    pub product_id: Option<String>,
    /// Category captured at the time of the action.
    pub category: Option<String>,
    /// Brand captured at the time of the action.
    pub brand: Option<String>,
    /// Free-form key/value payload.
    pub metadata: serde_json::Value,
    /// Store-assigned capture timestamp.
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Builds the stored form of `activity` with store-assigned fields.
    #[must_use]
    pub fn from_new(
        activity: NewActivity,
        event_id: Uuid,
        sequence: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            sequence,
            actor: activity.actor,
            action: activity.action,
            product_id: activity.product_id,
            category: activity.category,
            brand: activity.brand,
            metadata: activity.metadata,
            occurred_at,
        }
    }
}

/// Trims a free-text descriptor, mapping blank values to `None`.
#[must_use]
pub fn normalize_descriptor(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
