use serde::{Deserialize, Serialize};

pub mod product;
pub mod request;

pub use product::{Product, ProductView};
pub use request::{
    parse_colors, parse_limit, GenderPreference, RecommendationRequest, Rgb, DEFAULT_LIMIT,
};

/// Response body for the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub products: Vec<ProductView>,
}

impl RecommendationResult {
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Response body for the subcategory endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubcategoriesResponse {
    pub subcategories: Vec<String>,
}
