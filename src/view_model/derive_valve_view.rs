use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::{
    api::{NextRunEntry, NextRunTable, QueueSnapshot, ValveState},
    util::time_format::{format_duration, format_liters, format_next_run},
};

use super::{NextRunClass, QueuePositions, StatusClass, ToggleControl, ValveViewModel};

/// Ran for over a minute yet metered nothing: the flow sensing is broken.
const MALFUNCTION_MIN_SECONDS: i64 = 60;

fn status_class(valve: &ValveState) -> StatusClass {
    if !valve.enabled {
        StatusClass::Disabled
    } else if valve.is_suspended() {
        StatusClass::Suspended
    } else if valve.is_open {
        StatusClass::Open
    } else if valve.seconds_last.is_some_and(|s| s > MALFUNCTION_MIN_SECONDS)
        && valve.liters_last == Some(0.0)
    {
        StatusClass::Malfunction
    } else {
        StatusClass::Closed
    }
}

fn queue_badge(positions: &[usize]) -> Option<String> {
    let first = positions.first()?;
    Some(match positions.len() {
        1 => format!("Queued #{}", first),
        n => format!("Queued #{} (+{})", first, n - 1),
    })
}

fn progress_ratio(valve: &ValveState) -> Option<f64> {
    if !valve.run_active() || valve.seconds_duration <= 0 {
        return None;
    }
    // Remaining time stands still while suspended, so the ratio does too.
    Some((valve.seconds_remain as f64 / valve.seconds_duration as f64).clamp(0.0, 1.0))
}

/// Pure mapping from one valve's raw state to its card view model.
pub fn derive_valve_view<Tz: TimeZone>(
    valve: &ValveState,
    queued_positions: &[usize],
    next_run: Option<&NextRunEntry>,
    now: &DateTime<Tz>,
) -> ValveViewModel
where
    Tz::Offset: Display,
{
    let class = status_class(valve);

    let status_label = if class == StatusClass::Open && valve.seconds_duration > 0 {
        format!("Open ({})", format_duration(valve.seconds_remain))
    } else {
        class.label().to_string()
    };

    let progress = progress_ratio(valve);
    let remaining_text = progress.map(|_| format_duration(valve.seconds_remain));

    let daily_total_text = match format_liters(valve.liters_daily) {
        Some(liters) => format!("{} / {}", format_duration(valve.seconds_daily), liters),
        None => format_duration(valve.seconds_daily),
    };

    let next_run_text = match class {
        StatusClass::Disabled | StatusClass::Suspended => None,
        _ => {
            let instant = next_run.map(|entry| entry.schedule_time.with_timezone(&now.timezone()));
            format_next_run(instant.as_ref(), now)
        }
    };
    let next_run_class = if next_run_text.is_some() {
        NextRunClass::Scheduled
    } else {
        NextRunClass::None
    };

    ValveViewModel {
        name: valve.name.clone(),
        status_label,
        status_class: class,
        queue_badge_text: queue_badge(queued_positions),
        progress_ratio: progress,
        remaining_text,
        daily_total_text,
        next_run_text,
        next_run_class,
        enable_control: if valve.enabled { ToggleControl::Disable } else { ToggleControl::Enable },
        suspend_control: if valve.is_suspended() { ToggleControl::Resume } else { ToggleControl::Suspend },
    }
}

/// View models for every valve of a snapshot, in snapshot order.
pub fn derive_valve_views<Tz: TimeZone>(
    valves: &[ValveState],
    queue: &QueueSnapshot,
    next_runs: &NextRunTable,
    now: &DateTime<Tz>,
) -> Vec<ValveViewModel>
where
    Tz::Offset: Display,
{
    let positions = QueuePositions::index(queue);
    valves
        .iter()
        .map(|valve| {
            derive_valve_view(
                valve,
                positions.for_valve(&valve.name),
                next_runs.get(&valve.name),
                now,
            )
        })
        .collect()
}
