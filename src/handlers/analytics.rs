use axum::{extract::State, response::Json, routing::get, Router};

use crate::{
    errors::ServiceError,
    services::analytics::{
        AggregateStats, DashboardReport, RankedGroup, StatusByDestinationRow,
    },
    ApiResponse, AppState,
};

/// Build the analytics Router scoped under `/api/v1/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard_report))
        .route("/stats", get(get_stats))
        .route("/destinations", get(get_top_destinations))
        .route("/products", get(get_top_products))
        .route("/status-by-destination", get(get_status_by_destination))
}

/// Full dashboard payload: stats, top-5 groupings and the cross-tab.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    responses(
        (status = 200, description = "Dashboard report", body = ApiResponse<DashboardReport>)
    ),
    tag = "Analytics"
)]
pub async fn get_dashboard_report(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardReport>>, ServiceError> {
    let report = state.analytics.dashboard_report().await;
    Ok(Json(ApiResponse::success(report)))
}

/// Headline counters and totals only.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/stats",
    responses(
        (status = 200, description = "Aggregate statistics", body = ApiResponse<AggregateStats>)
    ),
    tag = "Analytics"
)]
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AggregateStats>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.analytics.stats().await)))
}

/// Top five destinations holding stock.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/destinations",
    responses(
        (status = 200, description = "Destination ranking", body = ApiResponse<Vec<RankedGroup>>)
    ),
    tag = "Analytics"
)]
pub async fn get_top_destinations(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RankedGroup>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.analytics.top_destinations().await,
    )))
}

/// Top five products in stock.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/products",
    responses(
        (status = 200, description = "Product ranking", body = ApiResponse<Vec<RankedGroup>>)
    ),
    tag = "Analytics"
)]
pub async fn get_top_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RankedGroup>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.analytics.top_products().await,
    )))
}

/// Per-destination status tallies for the stacked chart.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/status-by-destination",
    responses(
        (status = 200, description = "Status-by-destination cross-tab", body = ApiResponse<Vec<StatusByDestinationRow>>)
    ),
    tag = "Analytics"
)]
pub async fn get_status_by_destination(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StatusByDestinationRow>>>, ServiceError> {
    Ok(Json(ApiResponse::success(
        state.analytics.status_by_destination().await,
    )))
}
