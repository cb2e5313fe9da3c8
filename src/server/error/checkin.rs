//! Check-in error types.
//!
//! These errors are returned synchronously to the station that scanned or confirmed and
//! map onto 4xx responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{error_response, InternalServerError};

#[derive(Error, Debug)]
pub enum CheckinError {
    /// No active scan code maps to an active child.
    #[error("No active child found for scan code {0:?}")]
    ChildNotFound(String),
    /// Session id is unknown, or was swept after expiring.
    #[error("Check-in session {0:?} not found")]
    SessionNotFound(String),
    /// Session outlived its TTL before being confirmed.
    #[error("Check-in session {0:?} has expired")]
    SessionExpired(String),
    /// Session was already consumed by an earlier confirmation.
    #[error("Check-in session {0:?} has already been confirmed")]
    SessionAlreadyConfirmed(String),
    /// Station token is not in the admitted set.
    #[error("Station {0:?} is not admitted")]
    InvalidStation(String),
    /// Requested program is unknown or inactive.
    #[error("Program {0} not found or inactive")]
    ProgramNotFound(i32),
    /// No active program exists to default a check-in to.
    #[error("No active program configured")]
    NoActiveProgram,
    /// Checkout requested for a child without an open attendance record.
    #[error("Child {0} is not checked in")]
    NotCheckedIn(i32),
}

impl IntoResponse for CheckinError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::ChildNotFound(_) => error_response(StatusCode::NOT_FOUND, "Child not found"),
            Self::SessionNotFound(_) => error_response(StatusCode::NOT_FOUND, "Session not found"),
            // Lookups answer 410 themselves, a confirm against an expired session is a conflict
            Self::SessionExpired(_) => error_response(StatusCode::CONFLICT, "Session expired"),
            Self::SessionAlreadyConfirmed(_) => {
                error_response(StatusCode::CONFLICT, "Session already confirmed")
            }
            Self::InvalidStation(_) => error_response(StatusCode::BAD_REQUEST, "Invalid station"),
            Self::ProgramNotFound(_) => error_response(StatusCode::NOT_FOUND, "Program not found"),
            Self::NotCheckedIn(_) => {
                error_response(StatusCode::NOT_FOUND, "Child is not checked in")
            }
            Self::NoActiveProgram => InternalServerError(self).into_response(),
        }
    }
}
