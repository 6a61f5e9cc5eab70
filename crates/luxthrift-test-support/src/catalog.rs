//! Test catalog and user directory.

use async_trait::async_trait;
use luxthrift_core::catalog::{CatalogItem, CatalogRepository, UserDirectory, UserSummary};
use luxthrift_core::error::DomainError;

/// A catalog backed by a fixed list; list order is catalog order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
}

impl InMemoryCatalog {
    /// Creates a catalog holding `items`.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, DomainError> {
        Ok(self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }

    async fn find_matching(
        &self,
        category: Option<&str>,
        brand: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, DomainError> {
        Ok(self
            .items
            .iter()
            .filter(|item| {
                category == Some(item.category.as_str()) || brand == Some(item.brand.as_str())
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

/// A catalog that always fails.
#[derive(Debug)]
pub struct FailingCatalog;

#[async_trait]
impl CatalogRepository for FailingCatalog {
    async fn find_by_ids(&self, _ids: &[String]) -> Result<Vec<CatalogItem>, DomainError> {
        Err(DomainError::Infrastructure("catalog unavailable".into()))
    }

    async fn find_matching(
        &self,
        _category: Option<&str>,
        _brand: Option<&str>,
        _limit: usize,
    ) -> Result<Vec<CatalogItem>, DomainError> {
        Err(DomainError::Infrastructure("catalog unavailable".into()))
    }
}

/// A user directory backed by a fixed list.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Vec<UserSummary>,
}

impl InMemoryUserDirectory {
    /// Creates a directory holding `users`.
    #[must_use]
    pub fn new(users: Vec<UserSummary>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<UserSummary>, DomainError> {
        Ok(self
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }
}
