//! Utility helpers shared by services, workers and schedulers.

pub mod lock;
pub mod phone;
pub mod time;
