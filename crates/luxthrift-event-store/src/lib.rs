//! LuxThrift Event Store: PostgreSQL implementations of the repository
//! traits defined in `luxthrift-core`.

pub mod pg_activity_repository;
pub mod pg_catalog_repository;
pub mod schema;

pub use pg_activity_repository::PgActivityRepository;
pub use pg_catalog_repository::{PgCatalogRepository, PgUserDirectory};
