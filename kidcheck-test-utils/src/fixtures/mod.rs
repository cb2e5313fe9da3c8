//! Fixture helpers used while a test runs.
//!
//! - `family` - families, guardians, children and scan codes
//! - `program` - check-in programs
//! - `message` - queued guardian notifications and attendance rows
//! - `factory` - in-memory models that never touch the database

pub mod factory;
pub mod family;
pub mod message;
pub mod program;
