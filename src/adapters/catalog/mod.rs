//! Catalog adapters - PostgreSQL and in-memory implementations of `CatalogReader`.

mod in_memory_catalog;
mod postgres_catalog;

pub use in_memory_catalog::InMemoryCatalog;
pub use postgres_catalog::PostgresCatalog;
