use chrono::{NaiveDate, NaiveTime};

use crate::{
    api::SimulationRequest,
    error::{DashboardError, Result},
    session::SEASONS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimulateField {
    #[default]
    Date,
    Time,
    Uv,
    Season,
    Rain,
    Days,
}

impl SimulateField {
    pub const ALL: [SimulateField; 6] = [
        SimulateField::Date,
        SimulateField::Time,
        SimulateField::Uv,
        SimulateField::Season,
        SimulateField::Rain,
        SimulateField::Days,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SimulateField::Date => "Date ([YYYY-]MM-DD)",
            SimulateField::Time => "Time (HH:MM[:SS])",
            SimulateField::Uv => "UV index",
            SimulateField::Season => "Season",
            SimulateField::Rain => "Rain",
            SimulateField::Days => "Days",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Inputs of the "what would run" simulation. Empty fields are left to the
/// controller's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulateForm {
    pub date: String,
    pub time: String,
    pub uv: String,
    pub season: Option<usize>,
    pub rain: Option<bool>,
    pub days: String,
    pub focus: SimulateField,
    pub running: bool,
    pub report: Option<String>,
    pub scroll: u16,
}

impl SimulateForm {
    pub fn focus_next(&mut self) {
        let len = SimulateField::ALL.len();
        self.focus = SimulateField::ALL[(self.focus.position() + 1) % len];
    }

    pub fn focus_prev(&mut self) {
        let len = SimulateField::ALL.len();
        self.focus = SimulateField::ALL[(self.focus.position() + len - 1) % len];
    }

    pub fn value(&self, field: SimulateField) -> String {
        match field {
            SimulateField::Date => self.date.clone(),
            SimulateField::Time => self.time.clone(),
            SimulateField::Uv => self.uv.clone(),
            SimulateField::Season => self.season.map(|i| SEASONS[i].to_string()).unwrap_or_default(),
            SimulateField::Rain => match self.rain {
                Some(true) => "Yes".to_string(),
                Some(false) => "No".to_string(),
                None => String::new(),
            },
            SimulateField::Days => self.days.clone(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        let (field, accepts) = match self.focus {
            SimulateField::Date => (&mut self.date, c.is_ascii_digit() || c == '-'),
            SimulateField::Time => (&mut self.time, c.is_ascii_digit() || c == ':'),
            SimulateField::Uv => (&mut self.uv, c.is_ascii_digit() || c == '.'),
            SimulateField::Days => (&mut self.days, c.is_ascii_digit()),
            SimulateField::Season | SimulateField::Rain => {
                if c == ' ' {
                    self.toggle();
                }
                return;
            }
        };
        if accepts && field.len() < 10 {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = match self.focus {
            SimulateField::Date => &mut self.date,
            SimulateField::Time => &mut self.time,
            SimulateField::Uv => &mut self.uv,
            SimulateField::Days => &mut self.days,
            SimulateField::Season => {
                self.season = None;
                return;
            }
            SimulateField::Rain => {
                self.rain = None;
                return;
            }
        };
        field.pop();
    }

    /// Season cycles through the four seasons and back to unset; rain cycles
    /// unset, yes, no.
    pub fn toggle(&mut self) {
        match self.focus {
            SimulateField::Season => {
                self.season = match self.season {
                    None => Some(0),
                    Some(i) if i + 1 < SEASONS.len() => Some(i + 1),
                    Some(_) => None,
                }
            }
            SimulateField::Rain => {
                self.rain = match self.rain {
                    None => Some(true),
                    Some(true) => Some(false),
                    Some(false) => None,
                }
            }
            _ => {}
        }
    }

    pub fn to_request(&self) -> Result<SimulationRequest> {
        let date = non_empty(&self.date);
        if let Some(date) = &date {
            if !is_valid_date(date) {
                return Err(invalid("Date must be YYYY-MM-DD or MM-DD"));
            }
        }

        let time = non_empty(&self.time);
        if let Some(time) = &time {
            if !is_valid_time(time) {
                return Err(invalid("Time must be HH:MM or HH:MM:SS"));
            }
        }

        let uv = match non_empty(&self.uv) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| invalid("UV index must be a number"))?),
            None => None,
        };

        let days = match non_empty(&self.days) {
            Some(raw) => {
                let days = raw.parse::<u32>().map_err(|_| invalid("Days must be a whole number"))?;
                if days == 0 {
                    return Err(invalid("Days must be at least 1"));
                }
                Some(days)
            }
            None => None,
        };

        Ok(SimulationRequest {
            date,
            time,
            uv,
            season: self.season.map(|i| SEASONS[i].to_string()),
            rain: self.rain,
            days,
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Full dates, or month-day which the controller places in its current
/// year. Month-day is checked against a leap year so 02-29 passes.
fn is_valid_date(raw: &str) -> bool {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
        || (raw.len() == 5 && NaiveDate::parse_from_str(&format!("2000-{}", raw), "%Y-%m-%d").is_ok())
}

fn is_valid_time(raw: &str) -> bool {
    NaiveTime::parse_from_str(raw, "%H:%M").is_ok() || NaiveTime::parse_from_str(raw, "%H:%M:%S").is_ok()
}

fn invalid(message: &str) -> DashboardError {
    DashboardError::InvalidInput(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_sends_nothing() {
        let request = SimulateForm::default().to_request().unwrap();
        assert_eq!(request, SimulationRequest::default());
        assert!(request.query_pairs().is_empty());
    }

    #[test]
    fn filled_form_builds_request() {
        let mut form = SimulateForm {
            date: "2026-06-15".to_string(),
            time: "08:30".to_string(),
            uv: "8".to_string(),
            days: "7".to_string(),
            ..Default::default()
        };
        form.focus = SimulateField::Season;
        form.toggle();
        form.toggle();
        form.focus = SimulateField::Rain;
        form.input_char(' ');

        let request = form.to_request().unwrap();
        assert_eq!(request.season.as_deref(), Some("Summer"));
        assert_eq!(request.rain, Some(true));
        assert_eq!(request.uv, Some(8.0));
        assert_eq!(request.days, Some(7));
    }

    #[test]
    fn short_date_and_seconds_are_accepted() {
        let form = SimulateForm {
            date: "06-15".to_string(),
            time: "08:30:15".to_string(),
            ..Default::default()
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.date.as_deref(), Some("06-15"));
        assert_eq!(request.time.as_deref(), Some("08:30:15"));

        let form = SimulateForm { date: "02-29".to_string(), ..Default::default() };
        assert!(form.to_request().is_ok());
    }

    #[test]
    fn typing_is_filtered_per_field() {
        let mut form = SimulateForm::default();
        for c in "2026-0a6".chars() {
            form.input_char(c);
        }
        assert_eq!(form.date, "2026-06");
        form.focus_prev();
        assert_eq!(form.focus, SimulateField::Days);
        form.input_char('x');
        form.input_char('3');
        assert_eq!(form.days, "3");
        form.backspace();
        assert!(form.days.is_empty());
    }

    #[test]
    fn bad_values_are_rejected() {
        let form = SimulateForm { date: "15/06/2026".to_string(), ..Default::default() };
        assert_eq!(form.to_request().unwrap_err().user_message(), "Date must be YYYY-MM-DD or MM-DD");

        let form = SimulateForm { date: "13-01".to_string(), ..Default::default() };
        assert!(form.to_request().is_err());

        let form = SimulateForm { time: "8:30:99".to_string(), ..Default::default() };
        assert_eq!(form.to_request().unwrap_err().user_message(), "Time must be HH:MM or HH:MM:SS");

        let form = SimulateForm { days: "0".to_string(), ..Default::default() };
        assert_eq!(form.to_request().unwrap_err().user_message(), "Days must be at least 1");
    }
}
