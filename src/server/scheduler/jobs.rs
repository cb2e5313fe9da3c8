//! Maintenance jobs run by the scheduler.
//!
//! Each job does one pass and returns how many items it touched, so the scheduler can log
//! the count.

use chrono::Utc;

use crate::server::{
    error::Error,
    scheduler::MaintenanceContext,
    service::{checkin::CheckinService, notification::NotificationQueue},
};

/// Removes sessions that finished or expired longer ago than the sweep grace period.
pub async fn sweep_sessions(ctx: MaintenanceContext) -> Result<u64, Error> {
    Ok(ctx.sessions.sweep().await as u64)
}

/// Moves messages stuck IN_PROGRESS past the stale window back to RETRY.
pub async fn release_stale_claims(ctx: MaintenanceContext) -> Result<u64, Error> {
    NotificationQueue::new(&ctx.db, &ctx.checkin.retry)
        .release_stale(ctx.stale_claim_timeout)
        .await
}

/// Checks out children whose attendance stayed open past the configured window.
pub async fn auto_checkout(ctx: MaintenanceContext) -> Result<u64, Error> {
    CheckinService::new(&ctx.db, &ctx.sessions, &ctx.checkin)
        .auto_checkout_at(Utc::now().naive_utc(), ctx.auto_checkout_after_hours)
        .await
}
