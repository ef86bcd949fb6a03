//! Timestamp and duration formatting for incident views.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Placeholder for a missing timestamp or duration.
pub const MISSING: &str = "—";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Minute-precision timestamps with a numeric offset.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Missing or blank input yields [`MISSING`]. Input that does not parse is
/// returned unchanged, so precomputed values such as `"14:02"` pass through.
pub fn format_instant(timestamp: Option<&str>) -> String {
    let raw = match timestamp {
        Some(t) if !t.trim().is_empty() => t,
        _ => return MISSING.to_string(),
    };
    match parse_instant(raw) {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => raw.to_string(),
    }
}

/// Parse an ISO 8601 timestamp: RFC 3339 (any offset), minute precision
/// with `Z` or an offset, naive date-times taken as UTC, or a bare date taken
/// as midnight UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Some(at) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(at.with_timezone(&Utc));
    }
    let naive = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Humanize a second count: `45s`, `2m 5s`, `1h 1m`.
///
/// Fractions are truncated and negative values clamp to zero.
pub fn humanize_duration(seconds: Option<f64>) -> String {
    let secs = match seconds {
        Some(s) if !s.is_nan() => s.max(0.0).trunc() as u64,
        _ => return MISSING.to_string(),
    };
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs / 60) % 60)
    }
}
