//! Service layer.
//!
//! Services coordinate repositories and in-memory state for one request or one worker tick.
//! They are constructed per use over borrowed state and return the aggregated [`Error`].
//!
//! [`Error`]: crate::server::error::Error

pub mod checkin;
pub mod notification;
pub mod retry;
pub mod session;
