//! End-to-end tests over the in-process router with an in-memory store
//! and a stubbed summarizer.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gestor_api::config::AppConfig;
use gestor_api::errors::ServiceError;
use gestor_api::services::insights::Summarizer;
use gestor_api::storage::InMemoryStore;
use gestor_api::{app_router, events, AppState};

struct StubSummarizer;

#[async_trait::async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, ServiceError> {
        assert!(prompt.contains("Total records"));
        Ok("stub insight".to_string())
    }
}

fn test_app() -> Router {
    let (event_sender, event_rx) = events::channel(64);
    tokio::spawn(events::process_events(event_rx));

    let state = AppState::build(
        AppConfig::default(),
        Arc::new(InMemoryStore::new()),
        Arc::new(StubSummarizer),
        event_sender,
    );
    app_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_movement(app: &Router, body: Value) -> Value {
    let (status, response) = send(app, post_json("/api/v1/movements", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    response["data"].clone()
}

#[tokio::test]
async fn movement_crud_flow() {
    let app = test_app();

    let created = create_movement(
        &app,
        json!({
            "status": "in_stock",
            "supplier": "Acme Grains",
            "destination": "Santos Port",
            "weight": "12.5",
            "value": 30000,
            "invoice_date": "2026-03-01"
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "in_stock");
    assert_eq!(created["weight"], "12.5");

    let (status, fetched) = send(&app, get(&format!("/api/v1/movements/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["supplier"], "Acme Grains");

    let (status, updated) = send(
        &app,
        put_json(
            &format!("/api/v1/movements/{}", id),
            json!({ "status": "shipped", "supplier": "Acme Grains" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "shipped");
    // Wholesale replacement: the destination from creation is gone.
    assert_eq!(updated["data"]["destination"], "");

    let (status, _) = send(&app, delete(&format!("/api/v1/movements/{}", id))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get(&format!("/api/v1/movements/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn unknown_id_update_returns_404() {
    let app = test_app();
    let (status, _) = send(
        &app,
        put_json(
            "/api/v1/movements/00000000-0000-0000-0000-000000000000",
            json!({ "status": "in_stock" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_applies_view_status_and_date_filters() {
    let app = test_app();
    create_movement(
        &app,
        json!({ "status": "in_stock", "invoice_date": "2026-01-10" }),
    )
    .await;
    create_movement(
        &app,
        json!({ "status": "rejected", "invoice_date": "2026-02-10" }),
    )
    .await;
    create_movement(
        &app,
        json!({ "status": "shipped", "invoice_date": "2026-01-20" }),
    )
    .await;

    let (status, body) = send(&app, get("/api/v1/movements?view=entries")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|m| m["status"] == "in_stock" || m["status"] == "rejected"));

    let (_, body) = send(&app, get("/api/v1/movements?view=exits")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        get("/api/v1/movements?view=entries&status=rejected"),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        get("/api/v1/movements?date_field=invoice_date&date_start=2026-01-01&date_end=2026-01-31"),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, get("/api/v1/movements?status=bogus")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn newest_movement_is_listed_first() {
    let app = test_app();
    create_movement(&app, json!({ "status": "in_stock", "supplier": "old" })).await;
    create_movement(&app, json!({ "status": "in_stock", "supplier": "new" })).await;

    let (_, body) = send(&app, get("/api/v1/movements")).await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list[0]["supplier"], "new");
    assert_eq!(list[1]["supplier"], "old");
}

#[tokio::test]
async fn dashboard_report_reflects_the_collection() {
    let app = test_app();
    create_movement(
        &app,
        json!({ "status": "in_stock", "weight": 2, "destination": "A" }),
    )
    .await;
    create_movement(
        &app,
        json!({ "status": "shipped", "weight": 5, "destination": "B" }),
    )
    .await;
    create_movement(
        &app,
        json!({ "status": "in_stock", "weight": 3, "destination": "A" }),
    )
    .await;

    let (status, body) = send(&app, get("/api/v1/analytics/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["stats"]["in_stock_count"], 2);
    assert_eq!(report["stats"]["shipped_count"], 1);
    assert_eq!(report["stats"]["rejected_count"], 0);
    assert_eq!(report["stats"]["total_weight"], "10");

    let destinations = report["top_destinations"].as_array().unwrap();
    assert_eq!(destinations[0]["label"], "A");
    assert_eq!(destinations[0]["count"], 2);

    // Shipped movements appear in the cross-tab but not in the stock ranking.
    let rows = report["status_by_destination"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r["destination"] == "B" && r["shipped"] == 1));
}

#[tokio::test]
async fn missing_destination_groups_under_the_default_label() {
    let app = test_app();
    create_movement(&app, json!({ "status": "in_stock" })).await;

    let (_, body) = send(&app, get("/api/v1/analytics/destinations")).await;
    assert_eq!(body["data"][0]["label"], "Not Informed");

    let (_, body) = send(&app, get("/api/v1/analytics/products")).await;
    assert_eq!(body["data"][0]["label"], "No Description");
}

#[tokio::test]
async fn insight_lifecycle_over_http() {
    let app = test_app();
    create_movement(&app, json!({ "status": "in_stock", "supplier": "Acme" })).await;

    let (status, body) = send(&app, post_json("/api/v1/insights", json!({}))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["state"], "pending");

    // The stub resolves almost immediately; poll until completed.
    let mut completed = Value::Null;
    for _ in 0..100 {
        let (_, body) = send(&app, get("/api/v1/insights")).await;
        if body["data"]["state"] == "completed" {
            completed = body;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(completed["data"]["text"], "stub insight");

    let (status, body) = send(&app, delete("/api/v1/insights")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "idle");
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = test_app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["movement_count"], 0);

    let (status, _) = send(&app, get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
}
