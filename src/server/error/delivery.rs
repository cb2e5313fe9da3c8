//! Messaging channel error types.
//!
//! Delivery errors never reach a station. The worker records them on the queued message
//! as `last_error`, and `is_transient` decides whether the message is retried.

use std::time::Duration;

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Channel session is not ready (logged out, reconnecting).
    #[error("Messaging channel is not connected (state: {0})")]
    Disconnected(String),
    /// Send did not complete within the configured timeout.
    #[error("Send timed out after {0:?}")]
    Timeout(Duration),
    /// Channel accepted the request but reported a failure.
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// Address cannot be delivered to no matter how often it is retried.
    #[error("Invalid recipient address {0:?}")]
    InvalidAddress(String),
    /// Reading inbound messages failed.
    #[error("Failed to poll inbound messages: {0}")]
    Inbound(String),
}

impl DeliveryError {
    /// Whether a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidAddress(_))
    }
}

impl IntoResponse for DeliveryError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
