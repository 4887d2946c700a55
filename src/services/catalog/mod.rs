/// Product catalog abstraction
///
/// The catalog is the document store recommendations are drawn from. Every
/// implementation must honor `CatalogFilter` semantics: case-insensitive
/// substring tests on category labels and results ordered by
/// `average_rating` descending.
use crate::{error::AppResult, models::Product, services::query_builder::CatalogFilter};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PgCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Returns at most `limit` products matching `filter`, best rated first
    async fn find_products(&self, filter: &CatalogFilter, limit: usize) -> AppResult<Vec<Product>>;

    /// Returns the distinct, non-empty product types of matching products, sorted
    async fn product_types(&self, filter: &CatalogFilter) -> AppResult<Vec<String>>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}
