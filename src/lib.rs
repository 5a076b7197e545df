//! Gestor API Library
//!
//! Tracks logistics movements (inbound/outbound shipment records) through
//! a lifecycle of statuses and serves filtered table views, dashboard
//! aggregations and AI-generated insight summaries over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use services::analytics::AnalyticsService;
use services::insights::InsightService;
use services::movements::MovementService;
use storage::MovementStore;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: Arc<dyn MovementStore>,
    pub movements: MovementService,
    pub analytics: AnalyticsService,
    pub insights: InsightService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the full service graph over the given collaborators. The
    /// movement collection still has to be seeded via
    /// `state.movements.load()`.
    pub fn build(
        config: config::AppConfig,
        store: Arc<dyn MovementStore>,
        summarizer: Arc<dyn services::insights::Summarizer>,
        event_sender: events::EventSender,
    ) -> Self {
        let movements = MovementService::new(store.clone(), event_sender);
        let analytics = AnalyticsService::new(movements.clone());
        let insights = InsightService::new(summarizer);
        Self {
            config,
            store,
            movements,
            analytics,
            insights,
            started_at: Utc::now(),
        }
    }
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, errors::ServiceError>;

/// All `/api/v1` routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/movements", handlers::movements::movement_routes())
        .nest("/analytics", handlers::analytics::analytics_routes())
        .nest("/insights", handlers::insights::insight_routes())
}

/// Full application router: root banner, health probes, v1 API and
/// swagger UI, with shared state applied.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "gestor-api up" }))
        .merge(handlers::health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
