// Error handling module for the SongSnaps API
// Provides the central error type and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

/// Error types for order operations
/// All handlers return Result<T, ApiError>
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request referenced a plan code the catalog does not know
    #[error("Invalid plan type: {0}")]
    InvalidPlan(String),

    /// Lookup or fulfillment target does not exist
    #[error("Order not found")]
    OrderNotFound,

    /// Insert collided with an existing order id
    /// Must never be resolved by overwriting the existing record
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(String),

    /// Persistence collaborator unreachable or a write failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Request validation failure
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::StoreUnavailable(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::InvalidPlan(code) => {
                debug!("Rejected unknown plan code: {}", code);
                format!("Invalid plan type: {}", code)
            }
            ApiError::OrderNotFound => "Order not found".to_string(),
            ApiError::DuplicateOrderId(order_id) => {
                // Full detail stays in the logs; clients get a generic message
                error!("Order id collision on insert: {}", order_id);
                "Internal server error".to_string()
            }
            ApiError::StoreUnavailable(detail) => {
                error!("Order store error: {}", detail);
                "Internal server error".to_string()
            }
            ApiError::Validation(message) => message,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPlan(_) => StatusCode::BAD_REQUEST,
            ApiError::OrderNotFound => StatusCode::NOT_FOUND,
            ApiError::DuplicateOrderId(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}
