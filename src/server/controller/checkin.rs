use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        checkin::{
            CheckoutRequest, CheckoutResponse, ConfirmRequest, ConfirmResponse, ProgramDto,
            ScanRequest, ScanResponse, SessionSummaryDto,
        },
    },
    server::{
        error::{checkin::CheckinError, error_response, Error},
        model::app::AppState,
        service::checkin::CheckinService,
    },
};

pub static CHECKIN_TAG: &str = "checkin";

/// Open a check-in session for a scanned QR code
#[utoipa::path(
    post,
    path = "/api/scan",
    tag = CHECKIN_TAG,
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Session created, awaiting confirmation", body = ScanResponse),
        (status = 400, description = "Station is not admitted", body = ErrorDto),
        (status = 404, description = "No active child holds the code", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<impl IntoResponse, Error> {
    let service = CheckinService::new(&state.db, &state.sessions, &state.checkin);

    let response = service.scan(&request).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Confirm a pending session and check the child in
#[utoipa::path(
    post,
    path = "/api/checkin",
    tag = CHECKIN_TAG,
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Child checked in, or already checked in", body = ConfirmResponse),
        (status = 400, description = "Station is not admitted", body = ErrorDto),
        (status = 404, description = "Session or program not found", body = ErrorDto),
        (status = 409, description = "Session expired or already confirmed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn confirm(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRequest>,
) -> Result<impl IntoResponse, Error> {
    let service = CheckinService::new(&state.db, &state.sessions, &state.checkin);

    let response = service.confirm(&request).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// Get a session with the scanned child's details
#[utoipa::path(
    get,
    path = "/api/session/{session_id}",
    tag = CHECKIN_TAG,
    params(("session_id" = String, Path, description = "Session id returned by the scan")),
    responses(
        (status = 200, description = "Pending or confirmed session", body = SessionSummaryDto),
        (status = 404, description = "Session not found", body = ErrorDto),
        (status = 410, description = "Session expired", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let service = CheckinService::new(&state.db, &state.sessions, &state.checkin);

    match service.session_summary(&session_id).await {
        Ok(summary) => Ok((StatusCode::OK, Json(summary)).into_response()),
        Err(Error::CheckinError(CheckinError::SessionExpired(_))) => {
            Ok(error_response(StatusCode::GONE, "Session expired"))
        }
        Err(e) => Err(e),
    }
}

/// Check a child out
#[utoipa::path(
    post,
    path = "/api/checkout",
    tag = CHECKIN_TAG,
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Attendance record closed", body = CheckoutResponse),
        (status = 400, description = "Station is not admitted", body = ErrorDto),
        (status = 404, description = "Child is not checked in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, Error> {
    let service = CheckinService::new(&state.db, &state.sessions, &state.checkin);

    let response = service.checkout(&request).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// List active programs children can be checked into
#[utoipa::path(
    get,
    path = "/api/programs",
    tag = CHECKIN_TAG,
    responses(
        (status = 200, description = "Active programs ordered by minimum age", body = Vec<ProgramDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_programs(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let service = CheckinService::new(&state.db, &state.sessions, &state.checkin);

    let programs = service.list_programs().await?;

    Ok((StatusCode::OK, Json(programs)))
}
