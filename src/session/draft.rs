// src/session/draft.rs
use chrono::NaiveTime;

use crate::{
    api::{Schedule, TimeBase},
    error::{DashboardError, Result},
};

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];

/// Editable fields, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    TimeBase,
    StartTime,
    Offset,
    Duration,
    Days,
    Seasons,
    UvAdjustments,
}

impl DraftField {
    pub const ORDER: [DraftField; 7] = [
        DraftField::TimeBase,
        DraftField::StartTime,
        DraftField::Offset,
        DraftField::Duration,
        DraftField::Days,
        DraftField::Seasons,
        DraftField::UvAdjustments,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::TimeBase => "Based on",
            DraftField::StartTime => "Start",
            DraftField::Offset => "Offset (min)",
            DraftField::Duration => "Duration (min)",
            DraftField::Days => "Days",
            DraftField::Seasons => "Seasons",
            DraftField::UvAdjustments => "UV adjust",
        }
    }

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// In-progress copy of a schedule. Text fields hold raw input until
/// [`ScheduleDraft::to_schedule`] validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDraft {
    pub time_based_on: TimeBase,
    pub start_time: String,
    pub offset: String,
    pub duration: String,
    pub days: [bool; 7],
    pub seasons: [bool; 4],
    pub enable_uv_adjustments: bool,
    pub focus: DraftField,
    /// Highlighted entry within the day or season row.
    pub cursor: usize,
}

impl ScheduleDraft {
    pub fn blank() -> Self {
        Self {
            time_based_on: TimeBase::Fixed,
            start_time: "06:00".to_string(),
            offset: "0".to_string(),
            duration: "15".to_string(),
            days: [true; 7],
            seasons: [true; 4],
            enable_uv_adjustments: false,
            focus: DraftField::TimeBase,
            cursor: 0,
        }
    }

    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            time_based_on: schedule.time_based_on,
            start_time: schedule.fixed_start_time.clone().unwrap_or_default(),
            offset: schedule.offset_minutes.unwrap_or(0).to_string(),
            duration: schedule.duration.to_string(),
            days: flags(&WEEKDAYS, &schedule.days),
            seasons: flags(&SEASONS, &schedule.seasons),
            enable_uv_adjustments: schedule.enable_uv_adjustments,
            focus: DraftField::TimeBase,
            cursor: 0,
        }
    }

    /// Whether a field applies to the current time base.
    pub fn is_relevant(&self, field: DraftField) -> bool {
        match field {
            DraftField::StartTime => self.time_based_on == TimeBase::Fixed,
            DraftField::Offset => self.time_based_on != TimeBase::Fixed,
            _ => true,
        }
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(DraftField::ORDER.len() - 1);
    }

    fn step_focus(&mut self, step: usize) {
        let len = DraftField::ORDER.len();
        let mut index = self.focus.position();
        loop {
            index = (index + step) % len;
            if self.is_relevant(DraftField::ORDER[index]) {
                break;
            }
        }
        self.focus = DraftField::ORDER[index];
        self.cursor = 0;
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            DraftField::StartTime if (c.is_ascii_digit() || c == ':') && self.start_time.len() < 5 => {
                self.start_time.push(c)
            }
            DraftField::Offset if c.is_ascii_digit() || (c == '-' && self.offset.is_empty()) => {
                self.offset.push(c)
            }
            DraftField::Duration if c.is_ascii_digit() && self.duration.len() < 4 => {
                self.duration.push(c)
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            DraftField::StartTime => {
                self.start_time.pop();
            }
            DraftField::Offset => {
                self.offset.pop();
            }
            DraftField::Duration => {
                self.duration.pop();
            }
            _ => {}
        }
    }

    /// Space on the focused field: cycle the time base, flip the highlighted
    /// day or season, or flip UV adjustment.
    pub fn toggle(&mut self) {
        match self.focus {
            DraftField::TimeBase => self.time_based_on = self.time_based_on.next(),
            DraftField::Days => self.days[self.cursor.min(6)] ^= true,
            DraftField::Seasons => self.seasons[self.cursor.min(3)] ^= true,
            DraftField::UvAdjustments => self.enable_uv_adjustments ^= true,
            _ => {}
        }
    }

    pub fn move_cursor(&mut self, forward: bool) {
        let len = match self.focus {
            DraftField::Days => WEEKDAYS.len(),
            DraftField::Seasons => SEASONS.len(),
            _ => return,
        };
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    /// Validate and build the payload sent to the controller.
    pub fn to_schedule(&self) -> Result<Schedule> {
        let duration: u32 = self
            .duration
            .trim()
            .parse()
            .map_err(|_| invalid("Duration must be a whole number of minutes"))?;
        if duration == 0 {
            return Err(invalid("Duration must be greater than zero"));
        }

        let days = selected(&WEEKDAYS, &self.days);
        if days.is_empty() {
            return Err(invalid("Select at least one day"));
        }

        let (fixed_start_time, offset_minutes) = match self.time_based_on {
            TimeBase::Fixed => {
                let time = NaiveTime::parse_from_str(self.start_time.trim(), "%H:%M")
                    .map_err(|_| invalid("Start time must be HH:MM"))?;
                (Some(time.format("%H:%M").to_string()), None)
            }
            _ => {
                let raw = self.offset.trim();
                let offset = if raw.is_empty() || raw == "-" {
                    0
                } else {
                    raw.parse::<i64>().map_err(|_| invalid("Offset must be a number of minutes"))?
                };
                (None, Some(offset))
            }
        };

        Ok(Schedule {
            time_based_on: self.time_based_on,
            fixed_start_time,
            offset_minutes,
            duration,
            seasons: selected(&SEASONS, &self.seasons),
            days,
            enable_uv_adjustments: self.enable_uv_adjustments,
        })
    }
}

fn invalid(message: &str) -> DashboardError {
    DashboardError::InvalidSchedule(message.to_string())
}

fn flags<const N: usize>(names: &[&str; N], chosen: &[String]) -> [bool; N] {
    let mut out = [false; N];
    for (flag, name) in out.iter_mut().zip(names) {
        *flag = chosen.iter().any(|c| c.trim().eq_ignore_ascii_case(name));
    }
    out
}

fn selected<const N: usize>(names: &[&str; N], flags: &[bool; N]) -> Vec<String> {
    names
        .iter()
        .zip(flags)
        .filter(|(_, on)| **on)
        .map(|(name, _)| name.to_string())
        .collect()
}
