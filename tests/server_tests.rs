//! Tests for the HTTP API
//!
//! Drives the router directly, without binding a socket.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use profilestore::network::router;
use profilestore::QueryService;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use common::*;

const ROWS: usize = 16;

fn setup_router() -> (TempDir, Router) {
    let temp = TempDir::new().unwrap();
    let db = loaded_db(&temp, ROWS);
    (temp, router(QueryService::new(db)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Index
// =============================================================================

#[tokio::test]
async fn test_index_describes_endpoints() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "User Profiles API");
    assert_eq!(body["endpoints"][0]["path"], "/fid/<fid>");
    assert_eq!(body["endpoints"][1]["path"], "/location");
}

// =============================================================================
// By Identifier
// =============================================================================

#[tokio::test]
async fn test_fid_found() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/fid/1002").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Fid"], 1002);
    assert_eq!(body["Username"], "user2");
    assert_eq!(body["Location"], location_for(2));
    assert_eq!(body["Score"], 1.0);
    assert_eq!(body["Active"], true);
    assert_eq!(body.as_object().unwrap().len(), COLUMNS.len());
}

#[tokio::test]
async fn test_fid_null_column() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/fid/1009").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["Username"].is_null());
}

#[tokio::test]
async fn test_fid_not_found() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/fid/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No profile found with FID: 42");
}

// =============================================================================
// By Location
// =============================================================================

#[tokio::test]
async fn test_location_returns_array() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/location?lat=34.05&lon=-118.24").await;

    assert_eq!(status, StatusCode::OK);
    let profiles = body.as_array().unwrap();
    assert_eq!(profiles.len(), count_at(ROWS, LOS_ANGELES));
    assert!(profiles.iter().all(|p| p["Location"] == LOS_ANGELES));
}

#[tokio::test]
async fn test_location_fallback() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/location?lat=40.71&lon=-74.01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), count_at(ROWS, NEW_YORK_PRECISE));
}

#[tokio::test]
async fn test_location_missing_params() {
    for uri in ["/location", "/location?lat=34.05", "/location?lat=&lon=1"] {
        let (_temp, app) = setup_router();

        let (status, body) = get(app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], "Missing 'lat' or 'lon' parameters");
    }
}

#[tokio::test]
async fn test_location_non_numeric() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/location?lat=north&lon=-118.24").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid lat/lon format. Please provide numeric values."
    );
}

#[tokio::test]
async fn test_location_malformed_query_string_is_json() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/location?lat=1&lat=2&lon=2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate field"));
}

#[tokio::test]
async fn test_location_not_found() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/location?lat=10&lon=20").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        "No profiles found with location near lat:10.00, lon:20.00"
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_missing_database_is_server_error() {
    let temp = TempDir::new().unwrap();
    let app = router(QueryService::new(temp.path().join("absent.db")));

    let (status, body) = get(app, "/fid/1000").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("absent.db"));
}

#[tokio::test]
async fn test_fid_invalid_path_is_json() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/fid/%FF").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let (_temp, app) = setup_router();

    let (status, body) = get(app, "/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
