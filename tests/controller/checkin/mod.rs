//! Tests for station check-in endpoints.

mod checkout;
mod confirm;
mod get_session;
mod list_programs;
mod scan;

use axum::{extract::State, response::IntoResponse, Json};
use kidcheck::{
    model::checkin::{ConfirmRequest, ScanRequest, ScanResponse},
    server::{controller::checkin::scan, model::app::AppState},
};

use super::*;

fn scan_request(code: &str, station_id: &str) -> ScanRequest {
    ScanRequest {
        code: code.to_string(),
        station_id: station_id.to_string(),
        device_id: TEST_DEVICE.to_string(),
    }
}

fn confirm_request(session_id: &str) -> ConfirmRequest {
    ConfirmRequest {
        session_id: session_id.to_string(),
        station_id: TEST_STATION.to_string(),
        device_id: TEST_DEVICE.to_string(),
        actor: TEST_ACTOR.to_string(),
        program_id: None,
    }
}

/// Scan `code` at the test station and return the created session
async fn scan_ok(state: &AppState, code: &str) -> ScanResponse {
    let response = scan(
        State(state.clone()),
        Json(scan_request(code, TEST_STATION)),
    )
    .await
    .expect("scan should succeed")
    .into_response();

    body_json(response).await
}
