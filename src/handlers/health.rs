use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::handlers::AppState;
use crate::storage::MovementStore as _;

/// Component health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

/// Individual component health details
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Full health check response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub movement_count: usize,
    pub storage: ComponentHealth,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}

async fn probe_storage(state: &AppState) -> ComponentHealth {
    let started = Instant::now();
    match state.store.load().await {
        Ok(_) => ComponentHealth {
            status: ComponentStatus::Up,
            message: "storage reachable".into(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(err) => ComponentHealth {
            status: ComponentStatus::Down,
            message: err.to_string(),
            latency_ms: None,
        },
    }
}

/// Aggregated health report with the storage probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "A component is down", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = probe_storage(&state).await;
    let overall = storage.status.clone();

    let response = HealthResponse {
        status: overall.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds().max(0) as u64,
        movement_count: state.movements.count().await,
        storage,
    };

    let code = if overall == ComponentStatus::Up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}

/// Process-is-running probe.
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Ready-to-serve probe: requires the storage collaborator.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match probe_storage(&state).await.status {
        ComponentStatus::Up => (StatusCode::OK, "ready"),
        ComponentStatus::Down => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}
