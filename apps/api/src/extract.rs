//! # Request Extractors
//!
//! JSON extraction that speaks the API's error envelope.
//!
//! ## Rejection Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum::Json rejection            This wrapper                           │
//! │  ──────────────────────          ─────────────                          │
//! │                                                                         │
//! │  422 Unprocessable Entity        400 Bad Request                        │
//! │  text/plain body                 { "code": "VALIDATION_ERROR",          │
//! │                                    "message": "<rejection text>" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers use this `Json` for both request bodies and responses, so a
//! malformed payload surfaces in the same shape as any other validation
//! failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::validation(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use ramen_core::OrderStatus;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct StatusBody {
        status: OrderStatus,
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let Json(body) = Json::<StatusBody>::from_request(json_request(r#"{"status":"ready"}"#), &())
            .await
            .unwrap();
        assert_eq!(body.status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn test_malformed_json_becomes_400_envelope() {
        let err = Json::<StatusBody>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(matches!(err.code, ErrorCode::ValidationError));
    }

    #[tokio::test]
    async fn test_unknown_enum_value_becomes_400_envelope() {
        let err = Json::<StatusBody>::from_request(json_request(r#"{"status":"vaporized"}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(matches!(err.code, ErrorCode::ValidationError));
        assert!(!err.message.is_empty());
    }
}
