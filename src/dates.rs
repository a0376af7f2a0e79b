//! Published-date normalization across heterogeneous source formats.
//!
//! Feed entries and search-API results carry dates in at least four shapes:
//! ISO-8601 with `Z` or a numeric offset, RFC-2822 with a numeric or named
//! zone, a bare date, and a space-separated date-time. [`parse_published`]
//! tries each in order; [`normalize`] wraps it into a total function whose
//! fallback is the minimum representable timestamp, so records with
//! malformed dates sort last instead of crashing the sort.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel for unparseable or absent dates. Sorts after every real
/// timestamp under the descending recency order.
pub const SENTINEL: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// Trailing alphabetic zone name, e.g. `"... 12:00:00 EST"`.
static ZONE_NAME_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" [A-Za-z]{2,5}$").expect("zone suffix regex"));

/// Attempt to parse a raw published-date string into a UTC timestamp.
///
/// Formats are tried in order; the first success wins. Naive results are
/// assumed UTC. An alphabetic zone name that RFC-2822 parsing does not
/// resolve is coerced to `+0000` and retried, matching how the upstream
/// sources actually behave (zone names on these feeds are informational).
///
/// Returns `None` for absent, empty, or unrecognized input.
pub fn parse_published(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    // ISO-8601 / RFC-3339 with Z or numeric offset, e.g. News API's
    // "2025-07-14T09:30:00Z".
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // RFC-2822 with a numeric offset or a zone name chrono recognizes,
    // e.g. "Mon, 14 Jul 2025 09:30:00 +0000".
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // RFC-2822 with an unrecognized zone name: coerce to UTC and retry.
    if ZONE_NAME_SUFFIX.is_match(raw) {
        let coerced = ZONE_NAME_SUFFIX.replace(raw, " +0000");
        if let Ok(dt) = DateTime::parse_from_rfc2822(&coerced) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // Plain date, midnight UTC.
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }

    // Space-separated date-time, assumed UTC.
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ndt.and_utc());
    }

    None
}

/// Total normalization: like [`parse_published`] but mapping every failure
/// to [`SENTINEL`]. Callers sort on the result and never branch on failure.
pub fn normalize(raw: Option<&str>) -> DateTime<Utc> {
    parse_published(raw).unwrap_or(SENTINEL)
}
