use std::{fmt, str::FromStr};

/// Delivery status of a queued message as stored in `queued_message.status`.
///
/// `Sent` and `Failed` are terminal. `InProgress` only lasts while a worker holds the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Pending,
    InProgress,
    Sent,
    Failed,
    Retry,
}

impl MessageStatus {
    pub const ALL: [MessageStatus; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Sent,
        Self::Failed,
        Self::Retry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
            Self::Retry => "RETRY",
        }
    }

    /// Statuses a worker may claim.
    pub fn claimable() -> [&'static str; 2] {
        [Self::Pending.as_str(), Self::Retry.as_str()]
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| format!("Unknown message status {s:?}"))
    }
}

/// Kind of guardian notification, stored in `queued_message.message_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Sent to opted-in guardians on every check-in
    Checkin,
    /// Sent to every guardian after a child's second visit asking them to complete details
    RequestInfo,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkin => "checkin",
            Self::RequestInfo => "request_info",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
