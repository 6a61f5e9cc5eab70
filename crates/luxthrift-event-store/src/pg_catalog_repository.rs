//! `PostgreSQL` lookups over the storefront's `products` and `users` tables.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use luxthrift_core::catalog::{CatalogItem, CatalogRepository, UserDirectory, UserSummary};
use luxthrift_core::error::DomainError;

use crate::schema::{PRODUCT_COLUMNS, USER_COLUMNS};

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    brand: String,
    category: String,
    price: f64,
    image: Option<String>,
}

impl From<ProductRow> for CatalogItem {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            brand: row.brand,
            category: row.category,
            price: row.price,
            image: row.image,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: Option<String>,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

/// Read-only catalog backed by the `products` table.
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Creates a new `PgCatalogRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_matching(
        &self,
        category: Option<&str>,
        brand: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, DomainError> {
        if category.is_none() && brand.is_none() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category = $1 OR brand = $2 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $3"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category)
            .bind(brand)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }
}

/// Read-only user directory backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Creates a new `PgUserDirectory`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<UserSummary>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}
