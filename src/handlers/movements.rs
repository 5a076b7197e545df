use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    models::{DateField, Movement, MovementInput, StatusFilter, ViewType},
    services::filters::{filter_movements, DateRange},
    ApiResponse, AppState,
};

/// Build the movements Router scoped under `/api/v1/movements`.
pub fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route(
            "/:id",
            get(get_movement).put(update_movement).delete(delete_movement),
        )
}

/// Query parameters for the filtered table views.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MovementListQuery {
    /// View lens; defaults to the unrestricted dashboard set
    pub view: Option<ViewType>,
    /// Status filter value, or the sentinel "all"
    pub status: Option<String>,
    /// Which date attribute the range applies to (default: invoice_date)
    pub date_field: Option<DateField>,
    /// Inclusive lower date bound (YYYY-MM-DD)
    pub date_start: Option<String>,
    /// Inclusive upper date bound (YYYY-MM-DD)
    pub date_end: Option<String>,
}

impl MovementListQuery {
    fn status_filter(&self) -> Result<StatusFilter, ServiceError> {
        match self.status.as_deref() {
            None => Ok(StatusFilter::All),
            Some(raw) => StatusFilter::from_str(raw).map_err(|_| {
                ServiceError::ValidationError(format!("unknown status filter '{}'", raw))
            }),
        }
    }
}

/// List movements through the filter engine.
#[utoipa::path(
    get,
    path = "/api/v1/movements",
    params(MovementListQuery),
    responses(
        (status = 200, description = "Filtered movement list", body = ApiResponse<Vec<Movement>>),
        (status = 400, description = "Invalid filter parameter", body = crate::errors::ErrorResponse)
    ),
    tag = "Movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(params): Query<MovementListQuery>,
) -> Result<Json<ApiResponse<Vec<Movement>>>, ServiceError> {
    let status = params.status_filter()?;
    let view = params.view.unwrap_or(ViewType::Dashboard);
    let date_field = params.date_field.unwrap_or(DateField::InvoiceDate);
    let range = DateRange::new(params.date_start, params.date_end);

    let snapshot = state.movements.list().await;
    let filtered = filter_movements(&snapshot, view, status, date_field, &range);
    Ok(Json(ApiResponse::success(filtered)))
}

/// Create a movement record.
#[utoipa::path(
    post,
    path = "/api/v1/movements",
    request_body = MovementInput,
    responses(
        (status = 201, description = "Movement created", body = ApiResponse<Movement>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Movements"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    Json(input): Json<MovementInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let movement = state.movements.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(movement))))
}

/// Fetch a single movement by id.
#[utoipa::path(
    get,
    path = "/api/v1/movements/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    responses(
        (status = 200, description = "Movement found", body = ApiResponse<Movement>),
        (status = 404, description = "Movement not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Movements"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Movement>>, ServiceError> {
    let movement = state.movements.get(id).await?;
    Ok(Json(ApiResponse::success(movement)))
}

/// Replace a movement wholesale. All fields come from the payload; only
/// the id and the record's position in the collection are preserved.
#[utoipa::path(
    put,
    path = "/api/v1/movements/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    request_body = MovementInput,
    responses(
        (status = 200, description = "Movement replaced", body = ApiResponse<Movement>),
        (status = 404, description = "Movement not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Movements"
)]
pub async fn update_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<MovementInput>,
) -> Result<Json<ApiResponse<Movement>>, ServiceError> {
    let movement = state.movements.update(id, input).await?;
    Ok(Json(ApiResponse::success(movement)))
}

/// Delete a movement. Any "are you sure" confirmation belongs to the
/// caller; this endpoint deletes unconditionally.
#[utoipa::path(
    delete,
    path = "/api/v1/movements/{id}",
    params(("id" = Uuid, Path, description = "Movement ID")),
    responses(
        (status = 200, description = "Movement deleted", body = ApiResponse<String>),
        (status = 404, description = "Movement not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Movements"
)]
pub async fn delete_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    state.movements.delete(id).await?;
    Ok(Json(ApiResponse::success(format!("Movement {} deleted", id))))
}
