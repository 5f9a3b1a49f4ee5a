//! End-to-end smoke tests over the full router: health, the rescue flow,
//! and error envelope mapping.

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::util::ServiceExt;

use pawres_api::config::ServerConfig;
use pawres_api::router::build_app_router;
use pawres_api::state::AppState;
use pawres_db::Store;
use pawres_engine::{QueryCache, TransitionEngine};

/// Build a full app over a fresh temp database. Returns the tempdir so it
/// outlives the test body.
async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("api.db").display());
    let store = Store::connect(&url).await.expect("store");
    store.run_migrations().await.expect("migrations");

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: url,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cache_ttl_secs: 60,
    };
    let engine = TransitionEngine::new(store.clone(), QueryCache::new(config.cache_ttl()));
    let state = AppState {
        store,
        engine,
        classifier: Arc::new(pawres_core::classify::NoopClassifier),
        config: Arc::new(config.clone()),
    };
    (build_app_router(state, &config), dir)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
}

#[tokio::test]
async fn rescue_flow_end_to_end() {
    let (app, _dir) = test_app().await;

    // Register an admin to act with.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/users",
            serde_json::json!({
                "name": "Admin",
                "email": "admin@example.com",
                "password": "sufficiently-long",
                "role": "admin",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let admin_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    // Submit an anonymous rescue report.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/rescues",
            serde_json::json!({
                "location": "Main St bridge",
                "animal_type": "dog",
                "urgency": "high",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let report_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    // pending -> on_going -> rescued spawns an animal.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/rescues/{report_id}/transition"),
            serde_json::json!({ "target_status": "on_going", "actor_id": admin_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/rescues/{report_id}/transition"),
            serde_json::json!({ "target_status": "rescued", "actor_id": admin_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["data"]["created_animal_id"].is_i64());

    // Dashboard sees the open caseload.
    let response = app
        .clone()
        .oneshot(Request::get("/api/v1/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_animals"], 1);
}

#[tokio::test]
async fn invalid_transition_maps_to_400_envelope() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/users",
            serde_json::json!({
                "name": "Admin",
                "email": "admin@example.com",
                "role": "admin",
            }),
        ))
        .await
        .unwrap();
    let admin_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/rescues",
            serde_json::json!({ "location": "Pier 4" }),
        ))
        .await
        .unwrap();
    let report_id = json_body(response).await["data"]["id"].as_i64().unwrap();

    // pending -> rescued skips on_going.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/rescues/{report_id}/transition"),
            serde_json::json!({ "target_status": "rescued", "actor_id": admin_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn classify_without_model_is_unavailable() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/v1/animals/classify",
            serde_json::json!({ "photo": "ZmFrZS1pbWFnZS1ieXRlcw==" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn unknown_entity_returns_404_envelope() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(Request::get("/api/v1/animals/42").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
