//! Date and day-count formatting shared by the renderers

use chrono::{DateTime, Utc};

const DATE_LAYOUT: &str = "%Y-%m-%d %-I:%M%p %a";
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whether a timestamp is the zero value, i.e. never set
pub fn is_unset(timestamp: DateTime<Utc>) -> bool {
    timestamp == DateTime::<Utc>::default()
}

/// Days from `now` until `timestamp`, one decimal; empty for the zero value
pub fn number_of_days(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if is_unset(timestamp) {
        return String::new();
    }
    format_days(timestamp - now)
}

/// Length of a validity window in days, one decimal
pub fn duration_days(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> String {
    format_days(not_after - not_before)
}

/// `2024-07-15 3:04PM Mon (30.0 days)`
pub fn display_date(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!(
        "{} ({} days)",
        timestamp.format(DATE_LAYOUT),
        number_of_days(timestamp, now)
    )
}

fn format_days(delta: chrono::Duration) -> String {
    format!("{:.1}", delta.num_milliseconds() as f64 / MILLIS_PER_DAY)
}
