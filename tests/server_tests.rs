mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::StubGenerator;
use serde_json::{json, Value};
use tower::ServiceExt;
use travel_planner::{
    server::{router, AppState},
    GenerationClient, Orchestrator, PlanLog, TextGenerator,
};

fn app(generator: Arc<dyn TextGenerator>, plan_log: Option<PlanLog>) -> Router {
    let orchestrator = Arc::new(Orchestrator::new(generator));
    router(AppState::new(orchestrator).with_plan_log(plan_log))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_plan(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/plan-trip")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_root_reports_metadata() {
    let app = app(Arc::new(GenerationClient::disabled()), None);
    let (status, body) = send(app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "AI Travel Planner API");
    assert_eq!(body["ai_enabled"], false);
    assert!(body["endpoints"]["POST /api/plan-trip"].is_string());
}

#[tokio::test]
async fn test_health_reports_agent_count() {
    let app = app(Arc::new(StubGenerator::replying("{}")), None);
    let (status, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "agents": 7, "ai_configured": true}));
}

#[tokio::test]
async fn test_missing_destination_is_rejected_before_planning() {
    let stub = Arc::new(StubGenerator::replying("{}"));
    let app = app(stub.clone(), None);

    let (status, body) = send(
        app,
        post_plan(json!({
            "startDate": "2024-06-01",
            "endDate": "2024-06-04",
            "travelers": 2
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Destination is required"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_overlong_date_range_is_rejected_before_planning() {
    let stub = Arc::new(StubGenerator::replying("{}"));
    let dir = tempfile::tempdir().unwrap();
    let app = app(stub.clone(), Some(PlanLog::new(dir.path())));

    let (status, body) = send(
        app,
        post_plan(json!({
            "destination": "Paris",
            "startDate": "0001-01-01",
            "endDate": "9999-12-31",
            "travelers": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(stub.calls(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_undecodable_body_is_a_client_error() {
    let stub = Arc::new(StubGenerator::replying("{}"));
    let app = app(stub.clone(), None);

    let (status, body) = send(
        app,
        post_plan(json!({"destination": "Paris", "travelers": "several"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_plan_trip_returns_and_logs_plan() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let app = app(
        Arc::new(GenerationClient::disabled()),
        Some(PlanLog::new(&log_dir)),
    );

    let (status, body) = send(
        app,
        post_plan(json!({
            "destination": "Paris",
            "startDate": "2024-06-01",
            "endDate": "2024-06-04",
            "travelers": 2,
            "budget": "1200",
            "interests": ["food"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration"], 3);
    assert_eq!(body["overview"]["totalCost"], "1200");
    assert!(!body["localTips"].as_array().unwrap().is_empty());

    let entries: Vec<_> = std::fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("travel_plan_") && name.ends_with(".json"));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&entries[0]).unwrap()).unwrap();
    assert_eq!(saved, body);
}

#[tokio::test]
async fn test_log_write_failure_still_returns_plan() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();

    let app = app(
        Arc::new(GenerationClient::disabled()),
        Some(PlanLog::new(&blocker)),
    );

    let (status, body) = send(
        app,
        post_plan(json!({
            "destination": "Rome",
            "startDate": "2024-06-01",
            "endDate": "2024-06-03",
            "travelers": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "Rome");
    assert_eq!(body["overview"]["totalCost"], "2500");
}
