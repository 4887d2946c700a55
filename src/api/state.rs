use std::sync::Arc;
use std::time::Duration;

use crate::db::Cache;
use crate::services::{
    catalog::ProductCatalog, image_relay::ImageRelay, recommendations::RecommendationResolver,
};

/// Shared application state. Nothing here is mutated after start-up.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ProductCatalog>,
    pub resolver: RecommendationResolver,
    pub relay: ImageRelay,
    pub cache: Option<Cache>,
    pub query_timeout: Duration,
    /// Referer/origin used by the pinned image relay
    pub pinned_image_origin: String,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        relay: ImageRelay,
        query_timeout: Duration,
        pinned_image_origin: impl Into<String>,
    ) -> Self {
        Self {
            resolver: RecommendationResolver::new(catalog.clone(), query_timeout),
            catalog,
            relay,
            cache: None,
            query_timeout,
            pinned_image_origin: pinned_image_origin.into(),
        }
    }

    /// Enables Redis caching of subcategory lists
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }
}
