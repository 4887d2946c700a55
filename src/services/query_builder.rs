/// Catalog filters for recommendation lookups.
///
/// Category labels in the catalog are free text, so every category test is a
/// case-insensitive substring match. Two strictness tiers exist: `Strict`
/// uses every signal in the request, `Broad` keeps only the first class token
/// and gender so that sparse catalogs still produce results.
use std::fmt::Display;

use crate::models::{GenderPreference, Product, RecommendationRequest};

const UNISEX: &str = "unisex";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    Strict,
    Broad,
}

impl Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strictness::Strict => write!(f, "strict"),
            Strictness::Broad => write!(f, "broad"),
        }
    }
}

/// A storage-agnostic product filter. Class and type terms are lower-cased;
/// gender labels are compared exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFilter {
    pub strictness: Strictness,
    /// The product's clothing class must contain at least one of these
    pub class_terms: Vec<String>,
    /// The product's type must contain this, when set
    pub product_type: Option<String>,
    /// The product's gender must equal one of these, when set
    pub genders: Option<Vec<String>>,
}

impl CatalogFilter {
    /// Evaluates the filter against a single product
    pub fn matches(&self, product: &Product) -> bool {
        let class = product.clothing_class.to_lowercase();
        if !self.class_terms.iter().any(|term| class.contains(term)) {
            return false;
        }

        if let Some(wanted) = &self.product_type {
            match &product.product_type {
                Some(product_type) if product_type.to_lowercase().contains(wanted) => {}
                _ => return false,
            }
        }

        if let Some(genders) = &self.genders {
            match &product.gender {
                Some(gender) if genders.contains(gender) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Builds the catalog filter for a request at the given strictness
pub fn build_filter(request: &RecommendationRequest, strictness: Strictness) -> CatalogFilter {
    match strictness {
        Strictness::Strict => strict_filter(request),
        Strictness::Broad => broad_filter(request),
    }
}

fn strict_filter(request: &RecommendationRequest) -> CatalogFilter {
    CatalogFilter {
        strictness: Strictness::Strict,
        class_terms: request.class_tokens(),
        product_type: request.product_type.as_deref().map(str::to_lowercase),
        genders: strict_genders(&request.gender),
    }
}

fn broad_filter(request: &RecommendationRequest) -> CatalogFilter {
    let class_terms = request.class_tokens().into_iter().take(1).collect();
    let genders = request
        .gender
        .catalog_label()
        .map(|label| with_unisex(label.to_string()));

    CatalogFilter {
        strictness: Strictness::Broad,
        class_terms,
        product_type: None,
        genders,
    }
}

/// Filter for listing the product types available under a clothing class
pub fn subcategory_filter(clothing_class: &str, gender: &GenderPreference) -> CatalogFilter {
    CatalogFilter {
        strictness: Strictness::Strict,
        class_terms: vec![clothing_class.trim().to_lowercase()],
        product_type: None,
        genders: strict_genders(gender),
    }
}

/// Men and women also accept unisex; any other label must match exactly
fn strict_genders(gender: &GenderPreference) -> Option<Vec<String>> {
    match gender {
        GenderPreference::Any => None,
        GenderPreference::Men | GenderPreference::Women => {
            gender.catalog_label().map(|label| with_unisex(label.to_string()))
        }
        GenderPreference::Other(label) => Some(vec![label.clone()]),
    }
}

fn with_unisex(label: String) -> Vec<String> {
    if label == UNISEX {
        vec![label]
    } else {
        vec![label, UNISEX.to_string()]
    }
}
