use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::Product,
    services::{catalog::ProductCatalog, query_builder::CatalogFilter},
};

/// Catalog held in process memory, used by tests and local development
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<Vec<Product>>>,
    queries: Arc<AtomicUsize>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds a product to the catalog
    pub async fn insert(&self, product: Product) {
        self.products.write().await.push(product);
    }

    /// Number of product queries issued so far
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn find_products(&self, filter: &CatalogFilter, limit: usize) -> AppResult<Vec<Product>> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);

        let products = self.products.read().await;
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(Ordering::Equal)
        });
        matched.truncate(limit);

        Ok(matched)
    }

    async fn product_types(&self, filter: &CatalogFilter) -> AppResult<Vec<String>> {
        let products = self.products.read().await;
        let types: BTreeSet<String> = products
            .iter()
            .filter(|product| filter.matches(product))
            .filter_map(|product| product.product_type.clone())
            .filter(|product_type| !product_type.trim().is_empty())
            .collect();

        Ok(types.into_iter().collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderPreference, RecommendationRequest};
    use crate::services::query_builder::{build_filter, subcategory_filter, Strictness};

    fn product(id: &str, class: &str, product_type: &str, rating: f64) -> Product {
        Product {
            id: id.to_string(),
            title: id.to_string(),
            price: Some(10.0),
            clothing_class: class.to_string(),
            product_type: Some(product_type.to_string()),
            gender: Some("unisex".to_string()),
            color: None,
            image_url: None,
            product_url: None,
            brand: None,
            average_rating: rating,
        }
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            product("a", "tops", "Tee", 3.0),
            product("b", "tops", "Polo", 4.5),
            product("c", "tops", "Tee", 4.0),
            product("d", "pants", "Chino", 5.0),
        ])
    }

    #[tokio::test]
    async fn test_find_products_sorts_and_limits() {
        let catalog = catalog();
        let filter = build_filter(&RecommendationRequest::new("tops"), Strictness::Strict);

        let found = catalog.find_products(&filter, 2).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn test_product_types_are_distinct_and_sorted() {
        let catalog = catalog();
        let filter = subcategory_filter("tops", &GenderPreference::Any);

        let types = catalog.product_types(&filter).await.unwrap();
        assert_eq!(types, vec!["Polo".to_string(), "Tee".to_string()]);
    }

    #[tokio::test]
    async fn test_insert() {
        let catalog = InMemoryCatalog::default();
        catalog.insert(product("z", "shoes", "Boot", 1.0)).await;
        let filter = subcategory_filter("shoes", &GenderPreference::Any);
        assert_eq!(catalog.product_types(&filter).await.unwrap(), vec!["Boot"]);
    }
}
