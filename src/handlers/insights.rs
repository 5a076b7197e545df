use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use crate::{
    errors::ServiceError, services::insights::InsightStatus, ApiResponse, AppState,
};

/// Build the insights Router scoped under `/api/v1/insights`.
pub fn insight_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_insight).post(generate_insight).delete(dismiss_insight),
    )
}

/// Start a summarization over the current collection snapshot.
/// Returns 409 while a previous request is still pending.
#[utoipa::path(
    post,
    path = "/api/v1/insights",
    responses(
        (status = 202, description = "Summarization started", body = ApiResponse<InsightStatus>),
        (status = 409, description = "A request is already in flight", body = crate::errors::ErrorResponse)
    ),
    tag = "Insights"
)]
pub async fn generate_insight(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let snapshot = state.movements.list().await;
    let status = state.insights.generate(snapshot).await?;
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(status))))
}

/// Current state of the summarization slot.
#[utoipa::path(
    get,
    path = "/api/v1/insights",
    responses(
        (status = 200, description = "Current insight state", body = ApiResponse<InsightStatus>)
    ),
    tag = "Insights"
)]
pub async fn get_insight(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InsightStatus>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.insights.current().await)))
}

/// Dismiss the displayed result and return the slot to idle.
#[utoipa::path(
    delete,
    path = "/api/v1/insights",
    responses(
        (status = 200, description = "Insight dismissed", body = ApiResponse<InsightStatus>)
    ),
    tag = "Insights"
)]
pub async fn dismiss_insight(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InsightStatus>>, ServiceError> {
    Ok(Json(ApiResponse::success(state.insights.dismiss().await)))
}
