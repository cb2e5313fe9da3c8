//! Time helpers for session expiry, retry scheduling and age calculation.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

/// Whole seconds left until `deadline`, never negative.
pub fn seconds_until(now: NaiveDateTime, deadline: NaiveDateTime) -> i64 {
    (deadline - now).num_seconds().max(0)
}

/// Largest delta handed out, keeps `now + delta` far from the representable limit.
const MAX_DELTA_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Convert a second count from configuration into a `TimeDelta`, saturating at 100 years.
pub fn delta_seconds(seconds: u64) -> TimeDelta {
    let seconds = i64::try_from(seconds)
        .unwrap_or(MAX_DELTA_SECONDS)
        .min(MAX_DELTA_SECONDS);

    TimeDelta::seconds(seconds)
}

/// Age in completed years on `today`.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();

    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    age.max(0)
}
