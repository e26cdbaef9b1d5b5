//! Display helpers shared by the front-ends

use crate::result::FORBIDDEN_NAME_CHARS;
use chrono::{DateTime, TimeZone, Utc};

/// Names longer than this are shortened on leaderboard rows
pub const DISPLAY_NAME_LEN: usize = 15;

/// Format seconds as `45s` or `2m 5s`
pub fn format_time(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Describe when a result was completed, relative to `now`
///
/// Whole elapsed days decide the wording: `Today`, `Yesterday`,
/// `N days ago` for less than a week, otherwise the date in `now`'s zone.
pub fn format_relative_date<Tz: TimeZone>(completed_at: DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let elapsed = now.with_timezone(&Utc) - completed_at;
    match elapsed.num_days().abs() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=6 => format!("{} days ago", days),
        _ => completed_at
            .with_timezone(&now.timezone())
            .date_naive()
            .format("%Y-%m-%d")
            .to_string(),
    }
}

/// Shorten `name` to `max` characters, marking the cut with `...`
pub fn truncate_name(name: &str, max: usize) -> String {
    match name.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &name[..cut]),
        None => name.to_string(),
    }
}

/// Strip markup-sensitive characters from raw name input and trim it
pub fn sanitize_player_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !FORBIDDEN_NAME_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}
