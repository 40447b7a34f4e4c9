/// API info endpoint
///
/// ```text
/// GET /
/// ```
///
/// ```json
/// {
///   "message": "ProjectHub API",
///   "graphql_endpoint": "/graphql",
///   "status": "running"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub message: String,
    pub graphql_endpoint: String,
    pub version: String,
    pub status: String,
}

pub async fn api_info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "ProjectHub API".to_string(),
        graphql_endpoint: state.config.api.graphql_path.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}
