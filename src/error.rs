use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable, machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "validation_error",
            AppError::UpstreamFetch(_) => "upstream_fetch_error",
            AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Timeout(_)
            | AppError::Internal(_) => "server_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UpstreamFetch(msg) => {
                tracing::warn!(error = %msg, "Upstream image fetch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch image".to_string(),
                )
            }
            AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Timeout(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response =
            AppError::InvalidInput("Clothing class is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_fetch_maps_to_internal_error() {
        let response = AppError::UpstreamFetch("status 404".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_error_hides_details() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), "server_error");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
