//! ISO-8601 duration normalization
//!
//! Recipe markup carries timings as `PT1H30M`-style durations. This module
//! turns them into compact strings such as `1h 30m`. Anything that does not
//! look like an hours/minutes duration is passed through unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?").expect("duration pattern is valid"));

/// Normalize an ISO-8601 duration into `"<h>h <m>m"`.
///
/// Only the hour and minute components are read. Input that does not match,
/// or matches with neither component present, is returned as-is.
///
/// ```
/// use recipekit_web::extraction::normalize_duration;
///
/// assert_eq!(normalize_duration("PT1H30M"), "1h 30m");
/// assert_eq!(normalize_duration("PT45M"), "45m");
/// assert_eq!(normalize_duration("about an hour"), "about an hour");
/// ```
pub fn normalize_duration(raw: &str) -> String {
    let Some(caps) = DURATION_RE.captures(raw) else {
        return raw.to_string();
    };

    let hours = caps.get(1).map(|m| format!("{}h ", m.as_str()));
    let minutes = caps.get(2).map(|m| format!("{}m", m.as_str()));

    let joined = format!(
        "{}{}",
        hours.unwrap_or_default(),
        minutes.unwrap_or_default()
    );
    let trimmed = joined.trim();

    if trimmed.is_empty() {
        raw.to_string()
    } else {
        trimmed.to_string()
    }
}
