use std::sync::Arc;
use std::time::Duration;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::GenderPreference,
    services::{catalog::ProductCatalog, query_builder::subcategory_filter},
};

const SUBCATEGORY_CACHE_TTL: u64 = 3600; // 1 hour

/// Lists the product types available under a clothing class
pub async fn list_product_types(
    catalog: Arc<dyn ProductCatalog>,
    cache: Option<&Cache>,
    query_timeout: Duration,
    clothing_class: &str,
    gender: &GenderPreference,
) -> AppResult<Vec<String>> {
    if clothing_class.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Clothing class is required".to_string(),
        ));
    }

    let key = CacheKey::ProductTypes {
        clothing_class: clothing_class.to_string(),
        gender: gender.catalog_label().unwrap_or("all").to_string(),
    };

    let types: Vec<String> = cached!(cache, key, SUBCATEGORY_CACHE_TTL, async {
        let filter = subcategory_filter(clothing_class, gender);
        let types = tokio::time::timeout(query_timeout, catalog.product_types(&filter))
            .await
            .map_err(|_| {
                AppError::Timeout(format!("subcategory query exceeded {:?}", query_timeout))
            })??;

        tracing::info!(
            clothing_class = %clothing_class,
            results = types.len(),
            catalog = catalog.name(),
            "Product types fetched"
        );

        Ok::<_, AppError>(types)
    })?;

    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::services::catalog::InMemoryCatalog;

    fn product(class: &str, product_type: &str, gender: &str) -> Product {
        Product {
            id: format!("{}-{}", class, product_type),
            title: product_type.to_string(),
            price: None,
            clothing_class: class.to_string(),
            product_type: Some(product_type.to_string()),
            gender: Some(gender.to_string()),
            color: None,
            image_url: None,
            product_url: None,
            brand: None,
            average_rating: 0.0,
        }
    }

    fn catalog() -> Arc<dyn ProductCatalog> {
        Arc::new(InMemoryCatalog::new(vec![
            product("Men's Shirts", "Oxford", "men"),
            product("men's shirts", "Polo", "unisex"),
            product("Women's Shirts", "Blouse", "women"),
            product("men's pants", "Chino", "men"),
        ]))
    }

    #[tokio::test]
    async fn test_lists_types_for_class() {
        let types = list_product_types(
            catalog(),
            None,
            Duration::from_secs(1),
            "men's shirts",
            &GenderPreference::Any,
        )
        .await
        .unwrap();
        // "women's shirts" contains "men's shirts"; class matching is a plain
        // substring test and gender is what separates the two
        assert_eq!(types, vec!["Blouse", "Oxford", "Polo"]);
    }

    #[tokio::test]
    async fn test_gender_separates_overlapping_classes() {
        let types = list_product_types(
            catalog(),
            None,
            Duration::from_secs(1),
            "men's shirts",
            &GenderPreference::parse(Some("male")),
        )
        .await
        .unwrap();
        assert_eq!(types, vec!["Oxford", "Polo"]);
    }

    #[tokio::test]
    async fn test_gender_narrows_types() {
        let types = list_product_types(
            catalog(),
            None,
            Duration::from_secs(1),
            "shirts",
            &GenderPreference::parse(Some("female")),
        )
        .await
        .unwrap();
        // Unisex polos are offered to every gender
        assert_eq!(types, vec!["Blouse", "Polo"]);
    }

    #[tokio::test]
    async fn test_blank_class_is_rejected() {
        let result = list_product_types(
            catalog(),
            None,
            Duration::from_secs(1),
            " ",
            &GenderPreference::Any,
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
