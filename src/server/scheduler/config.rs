pub mod session_sweep {
    /// Cron expression for dropping finished sessions from memory
    /// Runs every minute at second 0
    pub const CRON_EXPRESSION: &str = "0 * * * * *";
}

pub mod stale_claims {
    /// Cron expression for releasing abandoned message claims
    /// Runs every 5 minutes (00:00, 00:05, 00:10, etc.)
    pub const CRON_EXPRESSION: &str = "0 */5 * * * *";
}

pub mod auto_checkout {
    /// Cron expression for closing attendance records left open
    /// Runs every hour at the top of the hour
    pub const CRON_EXPRESSION: &str = "0 0 * * * *";
}
