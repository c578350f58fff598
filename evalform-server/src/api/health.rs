//! Health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;

/// Liveness response: status, module name and version
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// Store round-trip response
#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub status: String,
    #[serde(rename = "recordCount")]
    pub record_count: i64,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health/db
///
/// Counts stored evaluations; a store failure answers 500.
pub async fn db_health_check(State(state): State<AppState>) -> ApiResult<Json<DbHealthResponse>> {
    let record_count = state.store.count().await?;
    Ok(Json(DbHealthResponse {
        status: "ok".to_string(),
        record_count,
    }))
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(db_health_check))
}
