//! Capability listing served at the root path

use axum::Json;
use serde::Serialize;

/// Endpoint map advertised by `GET /`
#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    #[serde(rename = "healthDb")]
    pub health_db: &'static str,
    pub submit: &'static str,
    pub evaluations: &'static str,
    pub metrics: &'static str,
    pub dashboard: &'static str,
    pub export: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub endpoints: Endpoints,
}

/// GET /
pub async fn serve_index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Evaluation API Server",
        endpoints: Endpoints {
            health: "/health",
            health_db: "/health/db",
            submit: "POST /submit-evaluation",
            evaluations: "/evaluations",
            metrics: "/evaluation-metrics/:id",
            dashboard: "/dashboard",
            export: "/export-csv",
        },
    })
}
