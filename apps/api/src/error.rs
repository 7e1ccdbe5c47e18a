//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Ramen POS                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /sales                                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<Json<T>, ApiError>                              │  │
//! │  │         │                                                        │  │
//! │  │  CheckoutError::Core(InsufficientStock) ──► 400 + message        │  │
//! │  │  CheckoutError::Db(NotFound)            ──► 404 + message        │  │
//! │  │  DbError::QueryFailed                   ──► 500 (logged)         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── { "code": "INSUFFICIENT_STOCK",                                    │
//! │        "message": "Insufficient stock for Chashu. Available: 0, ..." }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is a structured JSON body; nothing panics across the
//! handler boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ramen_core::CoreError;
use ramen_db::{CheckoutError, DbError};

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Sale not found: 1a2b..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// HTTP status, not serialized.
    #[serde(skip)]
    pub status: StatusCode,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Insufficient stock (400)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            status,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ConnectionFailed(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Database connection failed",
            ),
            DbError::MigrationFailed(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Database migration failed",
            ),
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Database operation failed",
                )
            }
            DbError::CorruptJson {
                table,
                column,
                reason,
            } => {
                tracing::error!("Corrupt JSON in {}.{}: {}", table, column, reason);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Stored document could not be decoded",
                )
            }
            DbError::PoolExhausted => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                "Database pool exhausted",
            ),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Database operation failed",
                )
            }
        }
    }
}

/// Converts core errors to API errors.
///
/// Checkout context maps everything user-caused to 400: a missing menu item
/// or inventory row on a checkout is bad input, not a bad URL.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::SaleNotFound(_) | CoreError::OrderNotFound(_) => ApiError::new(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                err.to_string(),
            ),
            CoreError::InsufficientStock { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InsufficientStock,
                err.to_string(),
            ),
            CoreError::MenuItemNotFound(_)
            | CoreError::IngredientNotFound(_)
            | CoreError::NotAnAddOn(_)
            | CoreError::RemovalNotInRecipe(_)
            | CoreError::RemovalExceedsRecipe { .. }
            | CoreError::Validation(_) => ApiError::validation(err.to_string()),
        }
    }
}

/// Converts checkout errors to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Core(e) => e.into(),
            CheckoutError::Db(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_maps_to_400() {
        let err: ApiError = CoreError::InsufficientStock {
            ingredient: "Chashu".to_string(),
            available: 0,
            required: 1,
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Available: 0"));
    }

    #[test]
    fn test_db_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Sale", "abc").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_checkout_menu_item_not_found_is_validation() {
        let err: ApiError =
            CheckoutError::Core(CoreError::MenuItemNotFound("abc".to_string())).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
