//! Read-only collaborators: the product catalog and the user directory.
//!
//! Neither is owned by this system. Activity events refer to their ids
//! weakly and never drive their lifecycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A product as seen by the CRM joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Opaque product id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Brand, used as a recommendation join key.
    pub brand: String,
    /// Category, used as a recommendation join key.
    pub category: String,
    /// Current price.
    pub price: f64,
    /// Primary image URL.
    pub image: Option<String>,
}

/// Display data for a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Opaque user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email, if known.
    pub email: Option<String>,
}

/// Read-only catalog lookups.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Returns the items whose ids are in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, DomainError>;

    /// Returns up to `limit` items whose category equals `category` or whose
    /// brand equals `brand`, in catalog order. `None` criteria match nothing.
    async fn find_matching(
        &self,
        category: Option<&str>,
        brand: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, DomainError>;
}

/// Read-only user lookups.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the users whose ids are in `ids`. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<UserSummary>, DomainError>;
}
