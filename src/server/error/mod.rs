//! Error types for the kidcheck server.
//!
//! Each domain has its own `thiserror` enum with an `IntoResponse` mapping; `Error`
//! aggregates them with external library errors so `?` works across layers.

pub mod checkin;
pub mod config;
pub mod delivery;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{checkin::CheckinError, config::ConfigError, delivery::DeliveryError},
};

/// Main error type for the kidcheck server.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Check-in errors (unknown codes, session state, station admission)
/// - Delivery errors (messaging channel failures, never surfaced over HTTP in practice)
/// - External library errors (database, scheduler)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Check-in session or attendance error.
    #[error(transparent)]
    CheckinError(#[from] CheckinError),
    /// Outbound or inbound messaging channel error.
    #[error(transparent)]
    DeliveryError(#[from] DeliveryError),
    /// Internal error indicating a bug in kidcheck's code.
    #[error("Internal error, this indicates a bug in kidcheck: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Listener bind or serve failure.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// Check-in errors carry their own status mapping, everything else becomes a 500.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::CheckinError(err) => err.into_response(),
            Self::DeliveryError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// The error is logged in full while the client only sees a generic message.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}

/// Build a JSON error response with the given status.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}
