//! HTTP controller endpoints for the kidcheck API.
//!
//! Axum handlers for station check-in traffic, the administrative message view and health.
//! Handlers build a service over the shared [`AppState`] per request and document themselves
//! for OpenAPI through utoipa.
//!
//! [`AppState`]: crate::server::model::app::AppState

pub mod admin;
pub mod checkin;
pub mod health;
