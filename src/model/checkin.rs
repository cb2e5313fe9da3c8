use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Body of a QR-code scan from a station tablet
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Opaque token read from the child's QR code
    pub code: String,
    pub station_id: String,
    pub device_id: String,
}

/// Child details shown to the volunteer while a session is pending
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChildDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub medical_notes: Option<String>,
    pub special_notes: Option<String>,
}

impl From<entity::child::Model> for ChildDto {
    fn from(child: entity::child::Model) -> Self {
        Self {
            id: child.id,
            first_name: child.first_name,
            last_name: child.last_name,
            birth_date: child.birth_date,
            allergies: child.allergies,
            medications: child.medications,
            medical_notes: child.medical_notes,
            special_notes: child.special_notes,
        }
    }
}

/// Session created by a successful scan
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub session_id: String,
    pub child: ChildDto,
    /// Seconds left before the session expires unconfirmed
    pub expires_in_seconds: i64,
}

/// Confirmation of a pending scan session
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub session_id: String,
    pub station_id: String,
    pub device_id: String,
    /// Volunteer confirming the check-in
    pub actor: String,
    /// Program to check the child into, defaults to the first active program
    #[serde(default)]
    pub program_id: Option<i32>,
}

/// Outcome of a confirmed check-in
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub attendance_id: i32,
    /// True when the child already had an open attendance record which was returned as is
    pub already_checked_in: bool,
    /// Number of guardian notifications queued by this check-in
    pub messages_queued: usize,
}

/// Pending or finished session as seen by a station
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDto {
    pub session_id: String,
    /// `PENDING`, `CONFIRMED` or `EXPIRED`
    pub status: String,
    pub station_id: String,
    pub device_id: String,
    pub expires_in_seconds: i64,
    pub family_name: String,
    /// Child's age in completed years on the day of the lookup
    pub age_years: i32,
    pub child: ChildDto,
}

/// Checkout of a child currently checked in
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub child_id: i32,
    pub station_id: String,
    pub actor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub attendance_id: i32,
    pub checkout_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDto {
    pub id: i32,
    pub name: String,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl From<entity::program::Model> for ProgramDto {
    fn from(program: entity::program::Model) -> Self {
        Self {
            id: program.id,
            name: program.name,
            min_age: program.min_age,
            max_age: program.max_age,
        }
    }
}
