//! Money and date formatting

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Integer cents as dollars, e.g. `1234` -> `$12.34`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Fractional cents (token costs) as dollars rounded to the cent
pub fn format_fractional_cents(cents: f64) -> String {
    format!("${:.2}", cents / 100.0)
}

/// Dollar amounts as the caller wrote them: `150` -> `$150`, `12.5` -> `$12.5`
pub fn format_dollars(dollars: f64) -> String {
    format!("${dollars}")
}

/// Parse `YYYY-MM-DD` (UTC midnight) or an RFC 3339 timestamp into
/// milliseconds since the epoch
pub fn parse_date_millis(input: &str) -> Result<i64> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp_millis());
        }
    }
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| Error::Other(format!("Invalid date '{input}': expected YYYY-MM-DD")))
}

/// Millisecond timestamp `days` days before `now`
pub fn days_before(now: DateTime<Utc>, days: i64) -> i64 {
    now.timestamp_millis() - days * MILLIS_PER_DAY
}
