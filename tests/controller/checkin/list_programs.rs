//! Tests for the program listing endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use kidcheck::{model::checkin::ProgramDto, server::controller::checkin::list_programs};

use super::*;

/// Tests listing the seeded programs.
///
/// Verifies active programs come back ordered by minimum age and inactive ones are hidden.
///
/// Expected: Ok with 200 OK response
#[tokio::test]
async fn lists_active_programs_by_age() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_checkin_tables()
        .with_default_programs()
        .build()
        .await?;
    test.program()
        .insert_program("Retired Class", Some(0), Some(1), false)
        .await?;

    let result = list_programs(State(test.into_app_state())).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let programs: Vec<ProgramDto> = body_json(resp).await;
    let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Nursery", "Toddlers", "Preschool", "Elementary"]);

    Ok(())
}
