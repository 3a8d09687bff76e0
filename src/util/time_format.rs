//! Short human strings for durations and instants.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Shown instead of a clock when there is nothing to count.
pub const ZERO_DURATION: &str = "0";

/// `H:MM:SS`, or `M:SS` when the hour field would be zero. Non-positive
/// input gives the `"0"` sentinel.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return ZERO_DURATION.to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Number of calendar days between the local dates of `instant` and `now`.
/// 23:59 tonight and 00:01 this morning are both distance 0.
pub fn calendar_day_distance<Tz: TimeZone>(instant: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    (instant.date_naive() - now.date_naive()).num_days()
}

/// Day bucket used by the next-run row.
pub fn day_bucket<Tz: TimeZone>(instant: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    match calendar_day_distance(instant, now) {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=6 => instant.format("%a").to_string(),
        _ => instant.format("%b %-d").to_string(),
    }
}

/// `"<bucket> • <h:mm AM>"`, or `None` when there is no instant.
pub fn format_next_run<Tz: TimeZone>(instant: Option<&DateTime<Tz>>, now: &DateTime<Tz>) -> Option<String>
where
    Tz::Offset: Display,
{
    let instant = instant?;
    Some(format!(
        "{} • {}",
        day_bucket(instant, now),
        instant.format("%-I:%M %p")
    ))
}

/// 24-hour clock for chart tooltips.
pub fn format_sample_time<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    instant.format("%H:%M:%S").to_string()
}

pub fn format_uptime(minutes: u64) -> String {
    format!("Uptime: {}h {}m", minutes / 60, minutes % 60)
}

/// Volume suffix for the daily total; zero volume is omitted.
pub fn format_liters(liters: f64) -> Option<String> {
    (liters > 0.0).then(|| format!("{:.1}L", liters))
}
