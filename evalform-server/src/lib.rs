//! evalform-server library - evaluation intake and review service
//!
//! Accepts scored evaluation forms, stores them in SQLite and serves them
//! back as JSON, as a per-category view and as a CSV export.

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use evalform_common::config::{ServiceConfig, DEFAULT_CORS_ORIGINS};
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod api;
pub mod db;
pub mod error;

pub use db::EvaluationStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: EvaluationStore,
}

impl AppState {
    pub fn new(store: EvaluationStore) -> Self {
        Self { store }
    }
}

/// Router settings that come from configuration
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,
    /// Folder holding `dashboard.html` and its assets
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            static_dir: None,
        }
    }
}

impl From<&ServiceConfig> for HttpSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            cors_origins: config.cors_origins.clone(),
            static_dir: config.static_dir.clone(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState, settings: &HttpSettings) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/", get(api::serve_index))
        .route("/submit-evaluation", post(api::submit_evaluation))
        .route("/evaluations", get(api::list_evaluations))
        .route("/evaluations/:id", get(api::get_evaluation))
        .route("/evaluation-metrics/:id", get(api::get_evaluation_metrics))
        .route("/export-csv", get(api::export_csv))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    let router = match settings.static_dir.as_ref().filter(|dir| dir.is_dir()) {
        Some(dir) => {
            info!("Serving dashboard from {}", dir.display());
            api.route_service("/dashboard", ServeFile::new(dir.join("dashboard.html")))
                .fallback_service(ServeDir::new(dir))
        }
        None => {
            if let Some(dir) = &settings.static_dir {
                warn!("Static folder {} not found; dashboard disabled", dir.display());
            }
            api
        }
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.cors_origins))
        .with_state(state)
}

/// CORS for the configured origins
///
/// `*` cannot be combined with credentials, so it is served by echoing the
/// request origin back.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin.trim() == "*") {
        warn!("CORS origin \"*\" configured; every origin will be allowed");
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(parse_origins(origins))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true)
}

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect()
}
