//! Tests for the session lookup endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{TimeDelta, Utc};
use kidcheck::{
    model::checkin::SessionSummaryDto,
    server::controller::checkin::{confirm, get_session},
};

use super::*;

/// Tests looking up a pending session.
///
/// Verifies the summary carries the child's notes, the family name and the station.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn returns_pending_session_details() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();
    let session = scan_ok(&state, TEST_SCAN_CODE).await;

    let result = get_session(State(state.clone()), Path(session.session_id.clone())).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: SessionSummaryDto = body_json(resp).await;
    assert_eq!(body.status, "PENDING");
    assert_eq!(body.family_name, "Johnson");
    assert_eq!(body.station_id, TEST_STATION);
    assert_eq!(body.child.special_notes.as_deref(), Some("Shy at drop-off"));

    Ok(())
}

/// Tests looking up a confirmed session.
///
/// Expected: Ok with status `CONFIRMED`
#[tokio::test]
async fn confirmed_session_stays_visible() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();
    let session = scan_ok(&state, TEST_SCAN_CODE).await;
    confirm(
        State(state.clone()),
        Json(confirm_request(&session.session_id)),
    )
    .await
    .unwrap();

    let result = get_session(State(state.clone()), Path(session.session_id)).await;

    let body: SessionSummaryDto = body_json(result.unwrap().into_response()).await;
    assert_eq!(body.status, "CONFIRMED");

    Ok(())
}

/// Tests looking up a session past its TTL.
///
/// Expected: Ok with 410 GONE response
#[tokio::test]
async fn expired_session_is_gone() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();
    let (session, _) = state
        .sessions
        .create_session_at(
            &state.db,
            TEST_SCAN_CODE,
            TEST_STATION,
            TEST_DEVICE,
            Utc::now().naive_utc() - TimeDelta::minutes(1),
        )
        .await
        .unwrap();

    let result = get_session(State(state.clone()), Path(session.session_id)).await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::GONE);

    Ok(())
}

/// Tests looking up an unknown session id.
///
/// Expected: Err with 404 NOT FOUND response
#[tokio::test]
async fn unknown_session_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_checkin_tables().build().await?;

    let result = get_session(State(test.into_app_state()), Path("missing".to_string())).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
