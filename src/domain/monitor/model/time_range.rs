//! Dashboard time ranges (`now-6h`, epoch millis, RFC3339) resolved to UTC bounds.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::domain::monitor::error::{MonitorError, MonitorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> MonitorResult<Self> {
        if start > end {
            return Err(MonitorError::Validation(
                "time range start must be before end".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Resolves raw `from`/`to` strings relative to `now`.
    pub fn parse(from: &str, to: &str, now: DateTime<Utc>) -> MonitorResult<Self> {
        let start = parse_bound(from, now)?;
        let end = parse_bound(to, now)?;
        Self::new(start, end)
    }

    /// `{start}/{end}` in RFC3339, the `timespan` query parameter.
    pub fn timespan(&self) -> String {
        format!(
            "{}/{}",
            self.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

fn parse_bound(raw: &str, now: DateTime<Utc>) -> MonitorResult<DateTime<Utc>> {
    let raw = raw.trim();

    if raw == "now" {
        return Ok(now);
    }

    if let Some(offset) = raw.strip_prefix("now-") {
        return now
            .checked_sub_signed(parse_relative(offset)?)
            .ok_or_else(|| MonitorError::Validation(format!("relative time out of range: {raw}")));
    }

    if let Ok(ms) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| MonitorError::Validation(format!("timestamp out of range: {raw}")));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| MonitorError::Validation(format!("invalid time bound '{raw}': {e}")))
}

fn parse_relative(offset: &str) -> MonitorResult<TimeDelta> {
    let invalid = || MonitorError::Validation(format!("invalid relative time 'now-{offset}'"));

    let split = offset
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (amount, unit) = offset.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;

    let delta = match unit {
        "s" => TimeDelta::try_seconds(amount),
        "m" => TimeDelta::try_minutes(amount),
        "h" => TimeDelta::try_hours(amount),
        "d" => TimeDelta::try_days(amount),
        "w" => TimeDelta::try_weeks(amount),
        _ => return Err(invalid()),
    };
    delta.ok_or_else(invalid)
}
