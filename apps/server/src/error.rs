//! # API Errors
//!
//! Maps domain and storage failures onto HTTP responses.
//!
//! ## Status Mapping
//! ```text
//! ValidationError / InvalidAmount / AlreadyDelivered  → 400
//! NotFound                                           → 404
//! InsufficientStock                                  → 409 (+ details)
//! storage failure                                    → 500 (cause logged only)
//! ```
//!
//! Every failure body has the same envelope:
//! `{"success": false, "error": {"code", "message", "field"?, "details"?}}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use stockbook_core::{CoreError, ValidationError};
use stockbook_db::DbError;
use tracing::{error, warn};

/// Machine-readable error code carried in every failure body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidAmount,
    AlreadyDelivered,
    NotFound,
    InsufficientStock,
    InternalError,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
            field: None,
            details: None,
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{} not found: {}", entity, id),
        )
    }

    pub fn internal() -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Internal server error",
        )
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = json!({
            "success": false,
            "error": self,
        });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, err.to_string())
            .with_field(field)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::NotFound { .. } => {
                ApiError::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
            }
            CoreError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => {
                warn!(product_id = %product_id, available, requested, "Sale rejected: insufficient stock");
                ApiError::new(StatusCode::CONFLICT, ErrorCode::InsufficientStock, message)
                    .with_details(json!({
                        "productId": product_id,
                        "productName": product_name,
                        "available": available,
                        "requested": requested,
                    }))
            }
            CoreError::InvalidAmount { field, .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidAmount, message)
                    .with_field(field)
            }
            CoreError::AlreadyDelivered { .. } => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::AlreadyDelivered, message)
            }
            CoreError::Validation(v) => v.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::Core(core) => core.into(),
            other => {
                error!(error = %other, "Storage failure");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(
            rejection.status(),
            ErrorCode::ValidationError,
            rejection.body_text(),
        )
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError,
            rejection.body_text(),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let err: ApiError = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            product_name: "Widget".to_string(),
            available: 70,
            requested: 71,
        }
        .into();

        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        let details = err.details.unwrap();
        assert_eq!(details["productName"], "Widget");
        assert_eq!(details["available"], 70);
        assert_eq!(details["requested"], 71);
    }

    #[test]
    fn test_validation_carries_field() {
        let err: ApiError = DbError::from(ValidationError::Required {
            field: "sellerName".to_string(),
        })
        .into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.field.as_deref(), Some("sellerName"));
    }

    #[test]
    fn test_storage_failure_hides_cause() {
        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::AlreadyDelivered).unwrap();
        assert_eq!(json, "\"ALREADY_DELIVERED\"");

        let body = serde_json::to_value(ApiError::not_found("Product", "x")).unwrap();
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body.get("field").is_none());
        assert!(body.get("status").is_none());
    }
}
