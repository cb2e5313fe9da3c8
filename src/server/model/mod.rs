//! Server-side models: application state, database model aliases, queue statuses and the
//! in-memory check-in session.

pub mod app;
pub mod db;
pub mod message;
pub mod session;
