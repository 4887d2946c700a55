use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        parse_colors, parse_limit, GenderPreference, RecommendationRequest, RecommendationResult,
        SubcategoriesResponse,
    },
    services::{
        image_relay::{RelayProfile, RelayedImage},
        subcategories,
    },
};

use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryQuery {
    pub clothing_class: Option<String>,
    pub gender: Option<String>,
}

/// Every field is optional text so that bad values degrade instead of
/// failing extraction
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    pub clothing_class: Option<String>,
    pub product_type: Option<String>,
    pub gender: Option<String>,
    pub colors: Option<String>,
    pub limit: Option<String>,
}

impl RecommendationQuery {
    fn into_request(self) -> AppResult<RecommendationRequest> {
        let clothing_class = required_clothing_class(self.clothing_class)?;

        Ok(RecommendationRequest::new(clothing_class)
            .with_product_type(self.product_type.as_deref())
            .with_gender(self.gender.as_deref())
            .with_colors(parse_colors(self.colors.as_deref()))
            .with_limit(parse_limit(self.limit.as_deref())))
    }
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

fn required_clothing_class(raw: Option<String>) -> AppResult<String> {
    raw.filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Clothing class is required".to_string()))
}

fn required_url(raw: Option<String>) -> AppResult<String> {
    raw.filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("URL parameter is required".to_string()))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists product types under a clothing class
pub async fn product_subcategories(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SubcategoryQuery>,
) -> AppResult<Json<SubcategoriesResponse>> {
    let clothing_class = required_clothing_class(params.clothing_class)?;
    let gender = GenderPreference::parse(params.gender.as_deref());

    tracing::info!(
        request_id = %request_id,
        clothing_class = %clothing_class,
        gender = gender.catalog_label().unwrap_or("all"),
        "Fetching subcategories"
    );

    let subcategories = subcategories::list_product_types(
        state.catalog.clone(),
        state.cache.as_ref(),
        state.query_timeout,
        &clothing_class,
        &gender,
    )
    .await?;

    Ok(Json(SubcategoriesResponse { subcategories }))
}

/// Recommends products for a clothing class
pub async fn product_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResult>> {
    let request = params.into_request()?;

    tracing::info!(
        request_id = %request_id,
        clothing_class = %request.clothing_class,
        product_type = ?request.product_type,
        gender = ?request.gender,
        colors = request.colors.len(),
        limit = request.limit,
        "Processing recommendation request"
    );

    let result = state.resolver.recommend(&request).await?;

    Ok(Json(result))
}

/// Relays an image from a general third-party host
pub async fn image_proxy(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> AppResult<RelayedImage> {
    let url = required_url(params.url)?;
    state.relay.fetch(&url, &RelayProfile::general()).await
}

/// Relays an image from the pinned source, buffered
pub async fn pinned_image(
    State(state): State<AppState>,
    Query(params): Query<ImageQuery>,
) -> AppResult<RelayedImage> {
    let url = required_url(params.url)?;
    let profile = RelayProfile::pinned(&state.pinned_image_origin);
    state.relay.fetch(&url, &profile).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_request() {
        let query = RecommendationQuery {
            clothing_class: Some("men's shirts".to_string()),
            product_type: Some("".to_string()),
            gender: Some("male".to_string()),
            colors: Some(r#"["rgb(0,0,255)"]"#.to_string()),
            limit: Some("abc".to_string()),
        };

        let request = query.into_request().unwrap();
        assert_eq!(request.clothing_class, "men's shirts");
        assert_eq!(request.product_type, None);
        assert_eq!(request.gender, GenderPreference::Men);
        assert_eq!(request.colors, vec!["rgb(0,0,255)".to_string()]);
        assert_eq!(request.limit, crate::models::DEFAULT_LIMIT);
    }

    #[test]
    fn test_missing_clothing_class_is_invalid() {
        let query = RecommendationQuery {
            clothing_class: Some("  ".to_string()),
            product_type: None,
            gender: None,
            colors: None,
            limit: None,
        };
        assert!(matches!(query.into_request(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_url_is_invalid() {
        assert!(matches!(required_url(None), Err(AppError::InvalidInput(_))));
        assert_eq!(required_url(Some("https://a/b.jpg".to_string())).unwrap(), "https://a/b.jpg");
    }
}
