use chrono::{DateTime, NaiveDateTime};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a backend timestamp for display.
/// Accepts RFC 3339 and offset-less ISO values; anything else falls back to
/// the raw date part.
pub fn format_timestamp(value: &str) -> String {
    const DISPLAY: &str = "%b %d, %Y %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.format(DISPLAY).to_string()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        dt.format(DISPLAY).to_string()
    } else if value.len() >= 10 {
        value.chars().take(10).collect()
    } else {
        value.to_string()
    }
}
