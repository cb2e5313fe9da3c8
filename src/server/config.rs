//! Environment configuration.
//!
//! Every setting has a default so a fresh checkout runs against a local SQLite file.
//! Values are read once at startup; `.env` is loaded by `main` through dotenvy.

use std::{fmt::Display, str::FromStr};

use crate::server::{
    error::config::ConfigError,
    service::notification::RetryPolicy,
    worker::config::{DeliveryWorkerConfig, OptInListenerConfig},
};

pub static DEFAULT_DATABASE_URL: &str = "sqlite://kidcheck.db?mode=rwc";
pub static DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub static DEFAULT_STATION_TOKENS: &str = "entrance-a,entrance-b,checkout-a";
pub static DEFAULT_OPT_IN_PHRASES: &str = "yes,start,subscribe";
pub static DEFAULT_COUNTRY_CODE: &str = "1";
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 40;
pub const DEFAULT_AUTO_CHECKOUT_AFTER_HOURS: u64 = 12;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Stations allowed to scan and confirm check-ins
    pub station_tokens: Vec<String>,
    pub session_ttl_seconds: u64,
    pub default_country_code: String,
    /// Open attendance older than this is closed by the hourly auto-checkout job
    pub auto_checkout_after_hours: u64,
    pub worker: DeliveryWorkerConfig,
    pub listener: OptInListenerConfig,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let default_country_code = env.string("DEFAULT_COUNTRY_CODE", DEFAULT_COUNTRY_CODE);
        if default_country_code.is_empty()
            || !default_country_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::invalid(
                "DEFAULT_COUNTRY_CODE",
                "must contain digits only",
            ));
        }

        let station_tokens = env.list("STATION_TOKENS", DEFAULT_STATION_TOKENS);
        if station_tokens.is_empty() {
            return Err(ConfigError::invalid(
                "STATION_TOKENS",
                "at least one station must be admitted",
            ));
        }

        let mut worker = DeliveryWorkerConfig::default();
        worker.poll_interval_ms = env
            .parse::<u64>("WORKER_POLL_INTERVAL", 2)?
            .checked_mul(1000)
            .ok_or_else(|| ConfigError::invalid("WORKER_POLL_INTERVAL", "out of range"))?;
        worker.batch_size = env.parse("WORKER_BATCH_SIZE", worker.batch_size)?;
        worker.send_timeout_seconds =
            env.parse("SEND_TIMEOUT_SECONDS", worker.send_timeout_seconds)?;
        worker.stale_claim_seconds =
            env.parse("CLAIM_STALE_AFTER_SECONDS", worker.stale_claim_seconds)?;

        if worker.batch_size == 0 {
            return Err(ConfigError::invalid("WORKER_BATCH_SIZE", "must be at least 1"));
        }

        let retry = RetryPolicy::new(
            env.parse("MESSAGE_MAX_ATTEMPTS", RetryPolicy::DEFAULT_MAX_ATTEMPTS)?,
            env.parse("RETRY_BASE_SECONDS", RetryPolicy::DEFAULT_BASE_SECONDS)?,
            env.parse(
                "RETRY_MAX_BACKOFF_SECONDS",
                RetryPolicy::DEFAULT_MAX_BACKOFF_SECONDS,
            )?,
        );

        if retry.max_attempts < 1 {
            return Err(ConfigError::invalid(
                "MESSAGE_MAX_ATTEMPTS",
                "must be at least 1",
            ));
        }

        let listener = OptInListenerConfig {
            phrases: env
                .list("OPT_IN_PHRASES", DEFAULT_OPT_IN_PHRASES)
                .into_iter()
                .map(|phrase| phrase.to_lowercase())
                .collect(),
            default_country_code: default_country_code.clone(),
            ..Default::default()
        };

        Ok(Self {
            database_url: env.string("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_address: env.string("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            station_tokens,
            session_ttl_seconds: env.parse("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECONDS)?,
            default_country_code,
            auto_checkout_after_hours: env
                .parse("AUTO_CHECKOUT_AFTER_HOURS", DEFAULT_AUTO_CHECKOUT_AFTER_HOURS)?,
            worker,
            listener,
            retry,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, var: &str, default: &str) -> String {
        (self.lookup)(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match (self.lookup)(var).map(|value| value.trim().to_string()) {
            Some(value) if !value.is_empty() => value
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(var, e.to_string())),
            _ => Ok(default),
        }
    }

    fn list(&self, var: &str, default: &str) -> Vec<String> {
        self.string(var, default)
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}
