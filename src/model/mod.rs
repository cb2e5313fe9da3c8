//! Request and response bodies exchanged over the HTTP API.

pub mod api;
pub mod checkin;
pub mod notification;
