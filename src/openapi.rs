use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the v1 API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gestor API",
        description = "Logistics movement tracking: lifecycle CRUD, filtered table views, dashboard aggregations and AI insight summaries."
    ),
    paths(
        // Movements
        crate::handlers::movements::list_movements,
        crate::handlers::movements::create_movement,
        crate::handlers::movements::get_movement,
        crate::handlers::movements::update_movement,
        crate::handlers::movements::delete_movement,

        // Analytics
        crate::handlers::analytics::get_dashboard_report,
        crate::handlers::analytics::get_stats,
        crate::handlers::analytics::get_top_destinations,
        crate::handlers::analytics::get_top_products,
        crate::handlers::analytics::get_status_by_destination,

        // Insights
        crate::handlers::insights::generate_insight,
        crate::handlers::insights::get_insight,
        crate::handlers::insights::dismiss_insight,

        // Health
        crate::handlers::health::health_check,
    ),
    components(schemas(
        crate::models::Movement,
        crate::models::MovementInput,
        crate::models::MovementStatus,
        crate::models::ViewType,
        crate::models::DateField,
        crate::services::analytics::AggregateStats,
        crate::services::analytics::RankedGroup,
        crate::services::analytics::StatusByDestinationRow,
        crate::services::analytics::DashboardReport,
        crate::services::insights::InsightStatus,
        crate::handlers::health::HealthResponse,
        crate::handlers::health::ComponentHealth,
        crate::handlers::health::ComponentStatus,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "Movements", description = "Movement lifecycle CRUD and filtered views"),
        (name = "Analytics", description = "Dashboard aggregations"),
        (name = "Insights", description = "AI-generated summaries"),
        (name = "Health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
