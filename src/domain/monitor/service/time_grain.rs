//! "auto" time grain selection.

use crate::domain::monitor::error::{MonitorError, MonitorResult};

/// 1m, 5m, 15m, 30m, 1h, 6h, 12h, 1d in milliseconds.
pub const DEFAULT_ALLOWED_INTERVALS_MS: [i64; 8] = [
    60_000, 300_000, 900_000, 1_800_000, 3_600_000, 21_600_000, 43_200_000, 86_400_000,
];

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Picks a grain for `interval_ms` from `allowed` (or `default_ladder` when
/// `allowed` is empty) and renders it as an ISO-8601 duration.
pub fn resolve(interval_ms: i64, allowed: &[i64], default_ladder: &[i64]) -> MonitorResult<String> {
    let ladder = if allowed.is_empty() { default_ladder } else { allowed };
    validate_ladder(ladder)?;

    let grain = closest_allowed_interval_ms(interval_ms, ladder);
    iso8601_from_interval_ms(grain)
}

/// Smallest ladder entry >= `interval_ms`, or the largest entry.
/// `ladder` must be non-empty and strictly ascending.
pub fn closest_allowed_interval_ms(interval_ms: i64, ladder: &[i64]) -> i64 {
    ladder
        .iter()
        .copied()
        .find(|allowed| interval_ms <= *allowed)
        .or_else(|| ladder.last().copied())
        .unwrap_or_default()
}

/// Renders whole-unit millisecond values as `P{n}D` / `PT{n}H` / `PT{n}M` / `PT{n}S`.
/// Anything under a minute becomes `PT1M`, the smallest grain the API accepts.
pub fn iso8601_from_interval_ms(interval_ms: i64) -> MonitorResult<String> {
    if interval_ms <= 0 {
        return Err(MonitorError::Config(format!(
            "could not convert interval {interval_ms}ms to an ISO 8601 duration"
        )));
    }
    if interval_ms < MINUTE_MS {
        return Ok("PT1M".to_string());
    }

    let duration = if interval_ms % DAY_MS == 0 {
        format!("P{}D", interval_ms / DAY_MS)
    } else if interval_ms % HOUR_MS == 0 {
        format!("PT{}H", interval_ms / HOUR_MS)
    } else if interval_ms % MINUTE_MS == 0 {
        format!("PT{}M", interval_ms / MINUTE_MS)
    } else if interval_ms % SECOND_MS == 0 {
        format!("PT{}S", interval_ms / SECOND_MS)
    } else {
        return Err(MonitorError::Config(format!(
            "interval {interval_ms}ms is not a whole number of seconds"
        )));
    };

    Ok(duration)
}

/// Explicit grains are passed through untouched, but must look like ISO 8601.
pub fn validate_explicit(grain: &str) -> MonitorResult<()> {
    if grain.len() > 1 && grain.starts_with('P') {
        Ok(())
    } else {
        Err(MonitorError::Config(format!(
            "time grain '{grain}' is not an ISO 8601 duration"
        )))
    }
}

fn validate_ladder(ladder: &[i64]) -> MonitorResult<()> {
    if ladder.is_empty() {
        return Err(MonitorError::Config("no allowed time grains".to_string()));
    }
    if ladder.iter().any(|ms| *ms <= 0) {
        return Err(MonitorError::Config(format!(
            "allowed time grains must be positive: {ladder:?}"
        )));
    }
    if ladder.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(MonitorError::Config(format!(
            "allowed time grains must be strictly ascending: {ladder:?}"
        )));
    }
    Ok(())
}
