/// HTTP-level errors
///
/// GraphQL operations report failures inside the GraphQL response (see
/// [`crate::graphql::error`]). `ApiError` covers what happens before or
/// outside the GraphQL engine: tenant resolution, health checks and startup
/// of the store.
///
/// Every error renders as `{"error": <message>, "code": <CODE>}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use projecthub_shared::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Tenant identifier names no organization (404)
    OrganizationNotFound(String),

    /// Store failure while serving a request (500)
    Internal(String),

    /// Store unreachable (503)
    ServiceUnavailable(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Stable machine-readable code
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::OrganizationNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::OrganizationNotFound(slug) => write!(f, "Organization not found: {}", slug),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self {
            ApiError::OrganizationNotFound(slug) => {
                tracing::debug!(slug = %slug, "Unknown organization slug");
                "Organization not found".to_string()
            }
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                msg
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::OrganizationNotFound("ghost".to_string());
        assert_eq!(err.to_string(), "Organization not found: ghost");

        let err = ApiError::Internal("pool timed out".to_string());
        assert_eq!(err.to_string(), "Internal error: pool timed out");
    }

    #[test]
    fn test_error_status_and_code() {
        let err = ApiError::OrganizationNotFound("ghost".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "ORGANIZATION_NOT_FOUND");

        let err = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_organization_not_found_body() {
        let response = ApiError::OrganizationNotFound("ghost".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Organization not found",
                "code": "ORGANIZATION_NOT_FOUND"
            })
        );
    }
}
