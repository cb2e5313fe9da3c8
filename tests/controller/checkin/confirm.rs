//! Tests for the confirm endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use kidcheck::{
    model::checkin::ConfirmResponse,
    server::{
        controller::checkin::confirm,
        data::{attendance::AttendanceRepository, message::MessageRepository},
    },
};

use super::*;

/// Tests the Emma scenario end to end.
///
/// Scanning `KID-001` at `entrance-a` and confirming as `vol1` within the TTL records a new
/// attendance and queues exactly one `checkin` message to Emma's only opted-in guardian.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn checks_in_and_notifies_opted_in_guardian() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household("KID-001", "Emma", true)
        .build()
        .await?;
    let emma = test.household("KID-001")?;
    let state = test.into_app_state();

    let session = scan_ok(&state, "KID-001").await;
    assert_eq!(session.expires_in_seconds, 40);

    let mut request = confirm_request(&session.session_id);
    request.station_id = "entrance-a".to_string();
    request.actor = "vol1".to_string();

    let result = confirm(State(state.clone()), Json(request)).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ConfirmResponse = body_json(resp).await;
    assert!(!body.already_checked_in);
    assert_eq!(body.messages_queued, 1);

    let open = AttendanceRepository::new(&test.db)
        .find_open(emma.child.id)
        .await?
        .unwrap();
    assert_eq!(open.id, body.attendance_id);
    assert_eq!(open.created_by, "vol1");
    assert_eq!(open.station_id, "entrance-a");

    let messages = MessageRepository::new(&test.db).list(None, 10).await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_type, "checkin");
    assert_eq!(messages[0].target_address, emma.guardian.phone);
    assert_eq!(messages[0].status, "PENDING");

    Ok(())
}

/// Tests confirming the same session twice.
///
/// Verifies that the second confirmation is rejected and does not write another attendance
/// record.
///
/// Expected: Err with 409 CONFLICT response on the second call
#[tokio::test]
async fn second_confirm_conflicts() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let state = test.into_app_state();

    let session = scan_ok(&state, TEST_SCAN_CODE).await;

    let first = confirm(
        State(state.clone()),
        Json(confirm_request(&session.session_id)),
    )
    .await;
    assert!(first.is_ok());

    let second = confirm(
        State(state.clone()),
        Json(confirm_request(&session.session_id)),
    )
    .await;

    let resp = second.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let visits = AttendanceRepository::new(&test.db)
        .count_for_child(emma.child.id)
        .await?;
    assert_eq!(visits, 1);

    Ok(())
}

/// Tests confirming after the session TTL.
///
/// Expected: Err with 409 CONFLICT response
#[tokio::test]
async fn expired_session_conflicts() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();

    // Created 41 seconds ago with the default 40 second TTL
    let (session, _) = state
        .sessions
        .create_session_at(
            &state.db,
            TEST_SCAN_CODE,
            TEST_STATION,
            TEST_DEVICE,
            Utc::now().naive_utc() - chrono::TimeDelta::seconds(41),
        )
        .await
        .unwrap();

    let result = confirm(
        State(state.clone()),
        Json(confirm_request(&session.session_id)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(MessageRepository::new(&test.db)
        .list(None, 10)
        .await?
        .is_empty());

    Ok(())
}

/// Tests confirming from a station that is not admitted.
///
/// Verifies the session survives the rejected request and can still be confirmed.
///
/// Expected: Err with 400 BAD REQUEST response, then Ok
#[tokio::test]
async fn invalid_station_keeps_session() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let state = test.into_app_state();

    let session = scan_ok(&state, TEST_SCAN_CODE).await;

    let mut request = confirm_request(&session.session_id);
    request.station_id = TEST_UNKNOWN_STATION.to_string();

    let rejected = confirm(State(state.clone()), Json(request)).await;
    let resp = rejected.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let accepted = confirm(
        State(state.clone()),
        Json(confirm_request(&session.session_id)),
    )
    .await;
    assert!(accepted.is_ok());

    Ok(())
}

/// Tests confirming an unknown session id.
///
/// Expected: Err with 404 NOT FOUND response
#[tokio::test]
async fn unknown_session_is_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .build()
        .await?;

    let result = confirm(
        State(test.into_app_state()),
        Json(confirm_request("missing")),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Tests the second-ever check-in of a child with an opted-in guardian.
///
/// Verifies that the visit queues the usual `checkin` message plus one `request_info` message
/// per guardian, including guardians who have not opted in.
///
/// Expected: Ok with one `checkin` and two `request_info` messages queued
#[tokio::test]
async fn second_visit_requests_info_from_every_guardian() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    test.family()
        .insert_guardian(emma.family.id, "+15550009999", false)
        .await?;
    let state = test.into_app_state();

    for visit in 0..2 {
        let session = scan_ok(&state, TEST_SCAN_CODE).await;
        let result = confirm(
            State(state.clone()),
            Json(confirm_request(&session.session_id)),
        )
        .await;
        let body: ConfirmResponse = body_json(result.unwrap().into_response()).await;

        if visit == 0 {
            assert_eq!(body.messages_queued, 1, "first visit only notifies");

            let open = AttendanceRepository::new(&test.db)
                .find_open(emma.child.id)
                .await?
                .unwrap();
            AttendanceRepository::new(&test.db)
                .checkout(open, Utc::now().naive_utc(), TEST_ACTOR)
                .await?;
        } else {
            assert_eq!(body.messages_queued, 3);
        }
    }

    let messages = MessageRepository::new(&test.db).list(None, 10).await?;
    let checkins = messages.iter().filter(|m| m.message_type == "checkin").count();
    let requests = messages
        .iter()
        .filter(|m| m.message_type == "request_info")
        .count();

    assert_eq!(checkins, 2);
    assert_eq!(requests, 2);

    Ok(())
}

/// Tests confirming a new session for a child who is already checked in.
///
/// Duplicate check-ins are a no-op returning the open record.
///
/// Expected: Ok with `already_checked_in` set and nothing queued
#[tokio::test]
async fn duplicate_checkin_returns_existing_record() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .with_household(TEST_SCAN_CODE, "Emma", true)
        .build()
        .await?;
    let emma = test.household(TEST_SCAN_CODE)?;
    let state = test.into_app_state();

    let first = scan_ok(&state, TEST_SCAN_CODE).await;
    let first = confirm(
        State(state.clone()),
        Json(confirm_request(&first.session_id)),
    )
    .await;
    let first: ConfirmResponse = body_json(first.unwrap().into_response()).await;

    let second = scan_ok(&state, TEST_SCAN_CODE).await;
    let result = confirm(
        State(state.clone()),
        Json(confirm_request(&second.session_id)),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ConfirmResponse = body_json(resp).await;

    assert!(body.already_checked_in);
    assert_eq!(body.attendance_id, first.attendance_id);
    assert_eq!(body.messages_queued, 0);

    let visits = AttendanceRepository::new(&test.db)
        .count_for_child(emma.child.id)
        .await?;
    assert_eq!(visits, 1);

    Ok(())
}
