//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every endpoint is registered here with its utoipa path so the generated OpenAPI document
//! stays in step with the router. Swagger UI is served at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `POST /api/scan` - Open a check-in session for a scanned code
/// - `POST /api/checkin` - Confirm a session and record attendance
/// - `GET /api/session/{session_id}` - Session details for the station display
/// - `POST /api/checkout` - Close a child's open attendance record
/// - `GET /api/programs` - Active programs
/// - `GET /api/admin/messages` - Queued messages with delivery bookkeeping
/// - `GET /api/health` - Liveness and messaging connection state
///
/// The OpenAPI specification is available at `/api/docs/openapi.json`.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "kidcheck", description = "kidcheck check-in API"), tags(
        (name = controller::checkin::CHECKIN_TAG, description = "Station check-in routes"),
        (name = controller::admin::ADMIN_TAG, description = "Administrative queries"),
        (name = controller::health::HEALTH_TAG, description = "Service health"),
    ))]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::checkin::scan))
        .routes(routes!(controller::checkin::confirm))
        .routes(routes!(controller::checkin::get_session))
        .routes(routes!(controller::checkin::checkout))
        .routes(routes!(controller::checkin::list_programs))
        .routes(routes!(controller::admin::list_messages))
        .routes(routes!(controller::health::health))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}
