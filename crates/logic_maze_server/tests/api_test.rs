//! Tests for the results REST API.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use logic_maze_server::{GameResultRepository, api};

fn setup_app() -> (NamedTempFile, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameResultRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, api::router(repo))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Body failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_result(body: Value) -> Request<Body> {
    Request::post("/api/results")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Valid request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("Valid request")
}

#[tokio::test]
async fn test_health() {
    let (_db, app) = setup_app();
    let response = app.oneshot(get("/health")).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_post_result_created() {
    let (_db, app) = setup_app();
    let (status, body) = send(&app, post_result(json!({"isWin": true, "movesCount": 6}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["completedAt"].is_string());
    assert_eq!(body["movesCount"], 6);
    assert_eq!(body["isWin"], true);
}

#[tokio::test]
async fn test_post_negative_moves_is_bad_request() {
    let (_db, app) = setup_app();
    let (status, body) = send(&app, post_result(json!({"isWin": false, "movesCount": -2}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("movesCount"));
}

#[tokio::test]
async fn test_post_malformed_body_is_client_error() {
    let (_db, app) = setup_app();
    let (status, _) = send(&app, post_result(json!({"isWin": "yes"}))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_list_newest_first_with_limit() {
    let (_db, app) = setup_app();
    for moves in [3, 5, 6] {
        let (status, _) = send(&app, post_result(json!({"isWin": false, "movesCount": moves}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get("/api/results?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    let moves: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["movesCount"].as_i64().unwrap())
        .collect();
    assert_eq!(moves, vec![6, 5]);
}

#[tokio::test]
async fn test_stats() {
    let (_db, app) = setup_app();
    send(&app, post_result(json!({"isWin": true, "movesCount": 6}))).await;
    send(&app, post_result(json!({"isWin": false, "movesCount": 2}))).await;

    let (status, body) = send(&app, get("/api/results/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRuns"], 2);
    assert_eq!(body["wins"], 1);
    assert_eq!(body["losses"], 1);
    assert_eq!(body["winRate"], 50.0);
    assert_eq!(body["bestWinMoves"], 6);
}

#[tokio::test]
async fn test_storage_failure_is_server_error() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    // No migrations: the table does not exist.
    let app = api::router(GameResultRepository::new(db_path).expect("repo"));

    let (status, body) = send(&app, get("/api/results/stats")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].is_string());
}
