//! Integration tests for beatshelf API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Catalog listing and clearing
//! - Import request validation
//! - Import error reporting when credentials are not configured
//!
//! Import tests run without credentials configured, so no request ever
//! reaches the osu! API.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

use beatshelf::config::Settings;
use beatshelf::models::{BeatmapRecord, DifficultySummary};
use beatshelf::services::curation::CurationRules;
use beatshelf::services::osu_client::OsuClient;
use beatshelf::{build_router, AppState};

/// Test helper: Create an in-memory catalog database
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Should create in-memory database");

    beatshelf::db::init_tables(&pool)
        .await
        .expect("Should initialize tables");

    pool
}

/// Test helper: Create app with test state (no credentials configured)
fn setup_app(db: SqlitePool) -> axum::Router {
    let state = AppState::new(
        db,
        Settings::default(),
        OsuClient::new().expect("Should build client"),
        CurationRules::nightcord().expect("Should compile rules"),
    );
    build_router(state)
}

/// Test helper: Create request with an empty body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Create request with a JSON body
fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn sample_record(bm_id: i64) -> BeatmapRecord {
    BeatmapRecord {
        bm_id,
        artist: "25時、ナイトコードで。".to_string(),
        title: format!("Song {}", bm_id),
        title_en: Some(format!("Song {}", bm_id)),
        mapper: "mapper".to_string(),
        length: "2:23".to_string(),
        mode: "osu".to_string(),
        difficulty: "Expert".to_string(),
        ranked_at: Some("2023-01-15".to_string()),
        bg_url: Some("https://assets.ppy.sh/beatmaps/1/covers/cover@2x.jpg".to_string()),
        beatmaps_json: vec![DifficultySummary {
            id: 1,
            mode: "osu".to_string(),
            version: "Expert".to_string(),
            stars: 5.95,
        }],
        created_at: None,
    }
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = test_request("GET", "/health");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "beatshelf");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

// =============================================================================
// Catalog Listing Tests
// =============================================================================

#[tokio::test]
async fn test_list_empty_catalog() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = test_request("GET", "/api/beatmaps");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_returns_records_newest_first() {
    let db = setup_test_db().await;

    beatshelf::db::beatmaps::upsert_beatmap(&db, &sample_record(10))
        .await
        .unwrap();
    beatshelf::db::beatmaps::upsert_beatmap(&db, &sample_record(20))
        .await
        .unwrap();

    let app = setup_app(db);
    let response = app.oneshot(test_request("GET", "/api/beatmaps")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["bm_id"], 20);
    assert_eq!(records[1]["bm_id"], 10);

    assert_eq!(records[0]["artist"], "25時、ナイトコードで。");
    assert_eq!(records[0]["length"], "2:23");
    assert_eq!(records[0]["difficulty"], "Expert");
    assert_eq!(records[0]["beatmaps_json"].as_array().unwrap().len(), 1);
    assert_eq!(records[0]["beatmaps_json"][0]["version"], "Expert");
    assert!(records[0]["created_at"].is_string());
}

// =============================================================================
// Catalog Clearing Tests
// =============================================================================

#[tokio::test]
async fn test_clear_catalog() {
    let db = setup_test_db().await;

    beatshelf::db::beatmaps::upsert_beatmap(&db, &sample_record(1))
        .await
        .unwrap();
    beatshelf::db::beatmaps::upsert_beatmap(&db, &sample_record(2))
        .await
        .unwrap();

    let app = setup_app(db);

    let response = app
        .clone()
        .oneshot(test_request("POST", "/api/beatmaps/clear"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["deleted"], 2);

    // Catalog is now empty; a second clear removes nothing
    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/beatmaps"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!([]));

    let response = app
        .oneshot(test_request("POST", "/api/beatmaps/clear"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["deleted"], 0);
}

// =============================================================================
// Import Validation Tests
// =============================================================================

#[tokio::test]
async fn test_import_requires_query() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = json_request("POST", "/api/import", json!({}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("query required"));
}

#[tokio::test]
async fn test_import_rejects_blank_query() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = json_request("POST", "/api/import", json!({ "query": "   " }));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_without_body_returns_json_error() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let response = app.oneshot(test_request("POST", "/api/import")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Failure body keeps the {"error": ...} shape even when extraction fails
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("query required"));
}

#[tokio::test]
async fn test_import_with_malformed_body_returns_json_error() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = Request::builder()
        .method("POST")
        .uri("/api/import")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("query required"));
}

// =============================================================================
// Import Error Reporting Tests
// =============================================================================

#[tokio::test]
async fn test_import_without_credentials_fails() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = json_request("POST", "/api/import", json!({ "query": "FREEDOM DiVE" }));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("credentials not configured"));
}

#[tokio::test]
async fn test_curated_import_without_credentials_fails() {
    let db = setup_test_db().await;
    let app = setup_app(db);

    let request = test_request("POST", "/api/import/nightcord");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("credentials not configured"));
}
