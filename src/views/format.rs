//! Display helpers shared by the listing pages.

use chrono::{DateTime, Utc};

use crate::models::parse_timestamp;

const INTERVALS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Relative age of a timestamp: "3 hours ago", "1 day ago", "Just now".
///
/// A missing or unparseable timestamp renders "Invalid date"; a timestamp
/// in the future renders "Just now".
#[must_use]
pub fn time_ago(raw: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(then) = raw.and_then(parse_timestamp) else {
        return "Invalid date".to_string();
    };
    let seconds = (now - then).num_seconds();

    for (unit, length) in INTERVALS {
        let count = seconds / length;
        if count >= 1 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{count} {unit}{plural} ago");
        }
    }
    "Just now".to_string()
}

/// Wall-clock time of a timestamp as `HH:MM`, empty when unparseable.
#[must_use]
pub fn clock_time(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// First `max_chars` characters followed by `...` when the text is longer.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Resolve a stored picture reference to a displayable URL.
///
/// Missing references use the default avatar; absolute URLs are kept;
/// anything else is a path on the media host.
#[must_use]
pub fn media_url(raw: Option<&str>, media_base: &str, default_avatar: &str) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default_avatar.to_string(),
        Some(url) if url.starts_with("http") => url.to_string(),
        Some(path) => format!(
            "{}/{}",
            media_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
    }
}

/// `part` as a percentage of `total` with one decimal, e.g. `"42.5%"`.
#[must_use]
pub fn percent_of(part: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_time_ago_units() {
        assert_eq!(time_ago(Some("2025-03-10T09:00:00Z"), now()), "3 hours ago");
        assert_eq!(time_ago(Some("2025-03-09T12:00:00Z"), now()), "1 day ago");
        assert_eq!(time_ago(Some("2025-03-10T11:59:30Z"), now()), "30 seconds ago");
        assert_eq!(time_ago(Some("2024-01-01T00:00:00Z"), now()), "1 year ago");
    }

    #[test]
    fn test_time_ago_edges() {
        assert_eq!(time_ago(Some("2025-03-10T12:00:00Z"), now()), "Just now");
        assert_eq!(time_ago(Some("2025-03-11T12:00:00Z"), now()), "Just now");
        assert_eq!(time_ago(Some("not a date"), now()), "Invalid date");
        assert_eq!(time_ago(None, now()), "Invalid date");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(
            truncate("this post is definitely longer", 20),
            "this post is definit..."
        );
        assert_eq!(truncate("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_media_url() {
        let base = "https://cdn.example/upload/";
        let fallback = "https://cdn.example/default.png";
        assert_eq!(media_url(None, base, fallback), fallback);
        assert_eq!(media_url(Some(""), base, fallback), fallback);
        assert_eq!(
            media_url(Some("https://img.host/a.png"), base, fallback),
            "https://img.host/a.png"
        );
        assert_eq!(
            media_url(Some("abc.png"), base, fallback),
            "https://cdn.example/upload/abc.png"
        );
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(1, 3), "33.3%");
        assert_eq!(percent_of(5, 0), "0.0%");
        assert_eq!(percent_of(10, 10), "100.0%");
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time(Some("2025-03-10T09:05:00Z")), "09:05");
        assert_eq!(clock_time(Some("garbage")), "");
    }
}
