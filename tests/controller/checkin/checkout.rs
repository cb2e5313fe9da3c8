//! Tests for the checkout endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use kidcheck::{
    model::checkin::{CheckoutRequest, CheckoutResponse, ConfirmResponse},
    server::{
        controller::checkin::{checkout, confirm},
        data::attendance::AttendanceRepository,
    },
};

use super::*;

fn checkout_request(child_id: i32) -> CheckoutRequest {
    CheckoutRequest {
        child_id,
        station_id: TEST_CHECKOUT_STATION.to_string(),
        actor: TEST_ACTOR.to_string(),
    }
}

/// Tests checking out a checked-in child.
///
/// Expected: Ok with 200 OK response and the record closed
#[tokio::test]
async fn closes_open_attendance() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let state = test.into_app_state();

    let session = scan_ok(&state, TEST_SCAN_CODE).await;
    let checked_in = confirm(
        State(state.clone()),
        Json(confirm_request(&session.session_id)),
    )
    .await;
    let checked_in: ConfirmResponse = body_json(checked_in.unwrap().into_response()).await;

    let result = checkout(State(state.clone()), Json(checkout_request(emma.child.id))).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: CheckoutResponse = body_json(resp).await;
    assert_eq!(body.attendance_id, checked_in.attendance_id);
    assert!(AttendanceRepository::new(&test.db)
        .find_open(emma.child.id)
        .await?
        .is_none());

    Ok(())
}

/// Tests checking out a child who is not checked in.
///
/// Expected: Err with 404 NOT FOUND response
#[tokio::test]
async fn child_not_checked_in_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;

    let result = checkout(
        State(test.into_app_state()),
        Json(checkout_request(emma.child.id)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests checking out from a station that is not admitted.
///
/// Expected: Err with 400 BAD REQUEST response
#[tokio::test]
async fn unknown_station_is_rejected() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;

    let mut request = checkout_request(emma.child.id);
    request.station_id = TEST_UNKNOWN_STATION.to_string();

    let result = checkout(State(test.into_app_state()), Json(request)).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
