/// Health check endpoint
///
/// Verifies the server is running and the entity store answers.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "store": "postgres",
///   "pool": { "size": 2, "idle": 1, "in_use": 1 }
/// }
/// ```
///
/// A store that fails its check yields `503` with code `SERVICE_UNAVAILABLE`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use projecthub_shared::db::pool::PoolStats;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Store backend name
    pub store: String,

    /// Connection pool occupancy, when the backend has a pool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if let Err(err) = state.store.health_check().await {
        tracing::error!(error = %err, backend = state.store.backend(), "Store health check failed");
        return Err(ApiError::ServiceUnavailable("Store unavailable".to_string()));
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend().to_string(),
        pool: state.store.pool_stats(),
    }))
}
