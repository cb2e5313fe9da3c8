use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Service liveness and the state of the messaging channel connection
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthDto {
    /// Always `ok` when the server answers
    pub status: String,
    /// Server time the report was produced
    pub timestamp: NaiveDateTime,
    /// `disconnected`, `authenticating` or `ready`
    pub messaging: String,
}
