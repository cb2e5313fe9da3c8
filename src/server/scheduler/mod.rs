//! Scheduler for periodic maintenance tasks.
//!
//! A cron-based job scheduler keeps in-memory sessions bounded, returns message claims
//! abandoned by a crashed send to the queue, and closes attendance records nobody checked out.

use std::{sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::Error,
    service::{checkin::CheckinSettings, session::SessionManager},
};

pub mod config;
pub mod jobs;

/// State handed to every maintenance job run.
#[derive(Clone)]
pub struct MaintenanceContext {
    pub db: DatabaseConnection,
    pub sessions: SessionManager,
    pub checkin: CheckinSettings,
    /// Claims older than this are released
    pub stale_claim_timeout: Duration,
    /// Attendance open longer than this many hours is closed
    pub auto_checkout_after_hours: u64,
}

/// Job scheduler for background maintenance tasks.
pub struct Scheduler {
    ctx: MaintenanceContext,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(ctx: MaintenanceContext) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { ctx, sched })
    }

    /// Registers all maintenance jobs and starts the scheduler.
    ///
    /// The following jobs are registered:
    /// - Session sweep (every minute)
    /// - Stale claim release (every 5 minutes)
    /// - Auto checkout (hourly)
    ///
    /// # Returns
    /// - `Ok(JobScheduler)` - Running scheduler, keep it to shut it down
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(mut self) -> Result<JobScheduler, Error> {
        self.schedule_job(
            config::session_sweep::CRON_EXPRESSION,
            "session sweep",
            jobs::sweep_sessions,
        )
        .await?;

        self.schedule_job(
            config::stale_claims::CRON_EXPRESSION,
            "stale claim release",
            jobs::release_stale_claims,
        )
        .await?;

        self.schedule_job(
            config::auto_checkout::CRON_EXPRESSION,
            "auto checkout",
            jobs::auto_checkout,
        )
        .await?;

        self.sched.start().await?;

        Ok(self.sched)
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// On execution the job logs the number of items it handled or the error it hit.
    ///
    /// # Arguments
    /// - `cron` - Cron expression defining when the job should run (e.g., "0 0 * * * *" for hourly)
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async job receiving a clone of the maintenance context
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(MaintenanceContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<u64, Error>> + Send + 'static,
    {
        let ctx = self.ctx.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let ctx = ctx.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(ctx).await {
                        Ok(0) => {}
                        Ok(count) => tracing::debug!("{} handled {} item(s)", name, count),
                        Err(e) => tracing::error!("Error running {}: {}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
