//! Handler error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use movies_core::ValidationError;

use crate::storage::StoreError;

/// Message returned with every 404.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

/// Errors surfaced by movie handlers. Each is turned into a response at the
/// handler boundary; none is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown movie identifier (404).
    #[error("movie not found")]
    NotFound,

    /// Payload failed schema validation (400).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Store invariant broken (500). The cause is logged, never sent.
    #[error(transparent)]
    Internal(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": NOT_FOUND_MESSAGE })),
            )
                .into_response(),
            Self::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.violations })),
            )
                .into_response(),
            Self::Internal(err) => {
                error!(error = %err, "store rejected a write");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use movies_core::FieldViolation;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_message() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "message": "Movie not found" }));
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_field_errors() {
        let err = ValidationError {
            violations: vec![FieldViolation::new("title", "required")],
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": [{ "field": "title", "message": "required" }] })
        );
    }

    #[tokio::test]
    async fn store_error_maps_to_internal_500() {
        let err = ApiError::from(StoreError::DuplicateId("1".into()));
        assert!(matches!(err, ApiError::Internal(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Internal server error" })
        );
    }
}
