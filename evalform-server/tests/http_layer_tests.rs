//! Integration tests for CORS and the static dashboard

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use evalform_common::db::init_in_memory;
use evalform_server::{build_router, AppState, EvaluationStore, HttpSettings};
use std::path::PathBuf;
use tower::util::ServiceExt;

async fn setup_app(static_dir: Option<PathBuf>) -> Router {
    let pool = init_in_memory().await.expect("Should create in-memory database");
    let settings = HttpSettings {
        static_dir,
        ..HttpSettings::default()
    };
    build_router(AppState::new(EvaluationStore::new(pool)), &settings)
}

fn get_from(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_allowed_origin_echoed() {
    let app = setup_app(None).await;

    let response = app
        .oneshot(get_from("/health", "http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_unlisted_origin_not_echoed() {
    let app = setup_app(None).await;

    let response = app
        .oneshot(get_from("/health", "https://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_wildcard_origin_echoes_caller() {
    let pool = init_in_memory().await.expect("Should create in-memory database");
    let settings = HttpSettings {
        cors_origins: vec!["*".to_string()],
        static_dir: None,
    };
    let app = build_router(AppState::new(EvaluationStore::new(pool)), &settings);

    let response = app
        .oneshot(get_from("/health", "https://anywhere.example"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://anywhere.example"
    );
}

#[tokio::test]
async fn test_origins_trimmed_and_blank_ignored() {
    let pool = init_in_memory().await.expect("Should create in-memory database");
    let settings = HttpSettings {
        cors_origins: vec![" http://a.test ".to_string(), "".to_string(), "bad\norigin".to_string()],
        static_dir: None,
    };
    let app = build_router(AppState::new(EvaluationStore::new(pool)), &settings);

    let response = app
        .oneshot(get_from("/health", "http://a.test"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://a.test"
    );
}

#[tokio::test]
async fn test_preflight() {
    let app = setup_app(None).await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/submit-evaluation")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_dashboard_served_from_static_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dashboard.html"), "<h1>Dashboard</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
    let app = setup_app(Some(dir.path().to_path_buf())).await;

    let response = app
        .clone()
        .oneshot(get_from("/dashboard", "http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>Dashboard</h1>");

    let response = app
        .clone()
        .oneshot(get_from("/app.js", "http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // API routes take precedence over static files
    let response = app
        .oneshot(get_from("/health", "http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_static_dir_disables_dashboard() {
    let app = setup_app(Some(PathBuf::from("/nonexistent/evalform/public"))).await;

    let response = app
        .oneshot(get_from("/dashboard", "http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
