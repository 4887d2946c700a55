/// Recommendation resolver
///
/// Runs a request through the two-tier matcher:
/// 1. STRICT: every supplied signal (class tokens, product type, gender)
/// 2. BROAD: first class token plus gender, only when STRICT found nothing
///
/// Colors never filter. They are normalized to palette names and used as a
/// ranking boost after retrieval, ahead of average rating.
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductView, RecommendationRequest, RecommendationResult},
    services::{
        catalog::ProductCatalog,
        color,
        query_builder::{build_filter, Strictness},
    },
};

/// Candidate window multiplier used when colors re-rank results
const COLOR_CANDIDATE_FACTOR: usize = 4;

#[derive(Clone)]
pub struct RecommendationResolver {
    catalog: Arc<dyn ProductCatalog>,
    query_timeout: Duration,
}

impl RecommendationResolver {
    pub fn new(catalog: Arc<dyn ProductCatalog>, query_timeout: Duration) -> Self {
        Self {
            catalog,
            query_timeout,
        }
    }

    /// Resolves a request into projected products.
    ///
    /// An empty result is a valid outcome, not an error.
    pub async fn recommend(&self, request: &RecommendationRequest) -> AppResult<RecommendationResult> {
        if request.clothing_class.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Clothing class is required".to_string(),
            ));
        }

        let preferred_colors = color::normalize_all(&request.colors);
        if !preferred_colors.is_empty() {
            tracing::debug!(colors = ?preferred_colors, "Using preferred colors");
        }

        let mut strictness = Strictness::Strict;
        let mut products = self
            .query(request, strictness, &preferred_colors)
            .await?;

        if products.is_empty() {
            tracing::info!(
                clothing_class = %request.clothing_class,
                "No products found with strict criteria, trying broader search"
            );
            strictness = Strictness::Broad;
            products = self
                .query(request, strictness, &preferred_colors)
                .await?;
        }

        tracing::info!(
            clothing_class = %request.clothing_class,
            strictness = %strictness,
            results = products.len(),
            catalog = self.catalog.name(),
            "Recommendations resolved"
        );

        Ok(RecommendationResult {
            products: products.iter().map(ProductView::from).collect(),
        })
    }

    /// Runs one tier against the catalog, then ranks and caps the results
    async fn query(
        &self,
        request: &RecommendationRequest,
        strictness: Strictness,
        preferred_colors: &[&str],
    ) -> AppResult<Vec<Product>> {
        let filter = build_filter(request, strictness);
        let window = if preferred_colors.is_empty() {
            request.limit
        } else {
            request.limit.saturating_mul(COLOR_CANDIDATE_FACTOR)
        };

        let candidates = tokio::time::timeout(
            self.query_timeout,
            self.catalog.find_products(&filter, window),
        )
        .await
        .map_err(|_| {
            AppError::Timeout(format!(
                "{} catalog query exceeded {:?}",
                strictness, self.query_timeout
            ))
        })??;

        Ok(rank(candidates, preferred_colors, request.limit))
    }
}

/// Orders products by color match, then rating, and keeps the first `limit`
pub fn rank(mut products: Vec<Product>, preferred_colors: &[&str], limit: usize) -> Vec<Product> {
    products.sort_by(|a, b| {
        let a_match = color_matches(a, preferred_colors);
        let b_match = color_matches(b, preferred_colors);
        b_match.cmp(&a_match).then_with(|| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(Ordering::Equal)
        })
    });
    products.truncate(limit);
    products
}

/// True when any word of the product's color label is a preferred color
fn color_matches(product: &Product, preferred_colors: &[&str]) -> bool {
    let Some(label) = product.color.as_deref() else {
        return false;
    };
    label
        .to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .any(|word| !word.is_empty() && preferred_colors.contains(&word))
}
