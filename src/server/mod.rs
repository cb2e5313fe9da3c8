//! Server application core modules.
//!
//! HTTP routing for check-in stations, the in-memory session store, database repositories,
//! the guardian notification queue with its delivery worker and opt-in listener, and the
//! maintenance scheduler.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
pub mod worker;
