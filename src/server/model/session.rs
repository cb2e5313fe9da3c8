use std::fmt;

use chrono::NaiveDateTime;

/// Lifecycle of a check-in session. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Confirmed,
    Expired,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short-lived binding of a scanned child to the station that scanned them.
///
/// Lives in memory only and is lost on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinSession {
    pub session_id: String,
    pub child_id: i32,
    pub station_id: String,
    pub device_id: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub status: SessionStatus,
}

impl CheckinSession {
    /// Whether a pending session has outlived its TTL at `now`. The deadline itself is
    /// still valid.
    pub fn is_past_ttl(&self, now: NaiveDateTime) -> bool {
        now > self.expires_at
    }
}
