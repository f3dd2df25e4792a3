mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_reports_service() {
    let app = TestApp::new();
    let resp = app.get("/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "healthy");
    assert_eq!(resp.body["service"], "scribe-test");
    let ts = resp.body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

#[tokio::test]
async fn index_responds() {
    let app = TestApp::new();
    let resp = app.get("/", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["service"], "scribe-test");
}

#[tokio::test]
async fn stats_count_rows() {
    let app = TestApp::new();

    let empty = app.get("/api/stats", None).await;
    assert_eq!(
        empty.body,
        json!({ "users": 0, "posts": 0, "comments": 0, "service": "scribe-test" })
    );

    let cookie = app.register("alice", "a@x.com", "pw1").await;
    app.post("/api/posts", Some(&cookie), json!({ "title": "T", "content": "C" }))
        .await;
    app.post("/api/posts/1/comments", Some(&cookie), json!({ "content": "a" }))
        .await;
    app.post("/api/posts/1/comments", Some(&cookie), json!({ "content": "b" }))
        .await;

    let stats = app.get("/api/stats", None).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["users"], 1);
    assert_eq!(stats.body["posts"], 1);
    assert_eq!(stats.body["comments"], 2);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = TestApp::new();
    let resp = app.get("/api/nope", None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body, json!({ "error": "Route not found" }));
}
