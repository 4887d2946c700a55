use axum::{
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderName, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

const CROSS_ORIGIN_RESOURCE_POLICY: &str = "cross-origin-resource-policy";

/// Creates the application router with every route the service exposes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static(CROSS_ORIGIN_RESOURCE_POLICY),
                    HeaderValue::from_static("cross-origin"),
                )),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/product-subcategories", get(handlers::product_subcategories))
        .route("/product-recommendations", get(handlers::product_recommendations))
        // Image relay
        .route("/image-proxy", get(handlers::image_proxy))
        .route("/amazon-image", get(handlers::pinned_image))
}
