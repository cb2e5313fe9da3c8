//! Tests for the scan endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use kidcheck::{model::checkin::ScanResponse, server::controller::checkin::scan};

use super::*;

/// Tests scanning an active code.
///
/// Verifies that scanning `KID-001` at `entrance-a` creates a session for Emma that
/// expires in 40 seconds.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn creates_session_for_active_code() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household("KID-001", "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();

    let result = scan(
        State(state.clone()),
        Json(scan_request("KID-001", "entrance-a")),
    )
    .await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ScanResponse = body_json(resp).await;
    assert_eq!(body.child.first_name, "Emma");
    assert_eq!(body.expires_in_seconds, 40);
    assert_eq!(state.sessions.len().await, 1);

    Ok(())
}

/// Tests scanning an unknown code.
///
/// Expected: Err with 404 NOT FOUND response
#[tokio::test]
async fn unknown_code_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;

    let result = scan(
        State(test.into_app_state()),
        Json(scan_request("KID-404", TEST_STATION)),
    )
    .await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests scanning a code that was revoked.
///
/// Verifies that a revoked code no longer resolves even though the child is active.
///
/// Expected: Err with 404 NOT FOUND response
#[tokio::test]
async fn revoked_code_is_not_found() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    test.family()
        .insert_scan_code(emma.child.id, "KID-OLD", false)
        .await?;

    let result = scan(
        State(test.into_app_state()),
        Json(scan_request("KID-OLD", TEST_STATION)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests scanning from a station that is not admitted.
///
/// Expected: Err with 400 BAD REQUEST response
#[tokio::test]
async fn unknown_station_is_rejected() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();

    let result = scan(
        State(state.clone()),
        Json(scan_request(TEST_SCAN_CODE, TEST_UNKNOWN_STATION)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.sessions.len().await, 0);

    Ok(())
}
