//! Date helpers: build timestamp, front-matter date parsing, rfc2822 output.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Environment variable honoured for reproducible builds.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// Timestamp of the current build.
///
/// Uses `SOURCE_DATE_EPOCH` when it holds a valid unix timestamp,
/// otherwise the current time.
pub fn build_timestamp() -> DateTime<Utc> {
    std::env::var(SOURCE_DATE_EPOCH)
        .ok()
        .and_then(|raw| parse_epoch(&raw))
        .unwrap_or_else(Utc::now)
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Convert git commit seconds to a UTC datetime.
pub fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Parse a front-matter date.
///
/// Accepted forms:
/// - RFC 3339: `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+02:00`
/// - `YYYY-MM-DD HH:MM[:SS]` (interpreted as UTC)
/// - `YYYY-MM-DD` (midnight UTC)
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a datetime the way rss 2.0 expects (`pubDate`, `lastBuildDate`).
pub fn to_rfc2822(dt: &DateTime<Utc>) -> String {
    dt.to_rfc2822()
}
