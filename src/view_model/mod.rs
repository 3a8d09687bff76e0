mod derive_valve_view;
mod queue_positions;
mod sensor_view;
mod system_view;

pub use derive_valve_view::{derive_valve_view, derive_valve_views};
pub use queue_positions::QueuePositions;
pub use sensor_view::{derive_sensor_view, SensorViewModel, TelemetryItem};
pub use system_view::{derive_system_view, SystemLevel, SystemViewModel};

/// Shown in the next-run row when the lookahead table has no entry.
pub const NO_UPCOMING_RUN: &str = "None in 7 days";

/// Valve status, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Disabled,
    Suspended,
    Open,
    Malfunction,
    Closed,
}

impl StatusClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Disabled => "disabled",
            StatusClass::Suspended => "suspended",
            StatusClass::Open => "open",
            StatusClass::Malfunction => "malfunction",
            StatusClass::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Disabled => "Disabled",
            StatusClass::Suspended => "Suspended",
            StatusClass::Open => "Open",
            StatusClass::Malfunction => "Malfunction",
            StatusClass::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextRunClass {
    Scheduled,
    None,
}

/// The one control the action bar shows for each toggle pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleControl {
    Enable,
    Disable,
    Suspend,
    Resume,
}

impl ToggleControl {
    pub fn label(&self) -> &'static str {
        match self {
            ToggleControl::Enable => "Enable",
            ToggleControl::Disable => "Disable",
            ToggleControl::Suspend => "Suspend",
            ToggleControl::Resume => "Resume",
        }
    }
}

/// Display-ready state of one valve card. Compared by value during
/// reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveViewModel {
    pub name: String,
    pub status_label: String,
    pub status_class: StatusClass,
    pub queue_badge_text: Option<String>,
    /// `remaining / duration` while a run is active and duration > 0.
    pub progress_ratio: Option<f64>,
    pub remaining_text: Option<String>,
    pub daily_total_text: String,
    pub next_run_text: Option<String>,
    pub next_run_class: NextRunClass,
    pub enable_control: ToggleControl,
    pub suspend_control: ToggleControl,
}

impl ValveViewModel {
    /// Text of the next-run row: the formatted run, or the reason there is
    /// none.
    pub fn next_run_row_text(&self) -> String {
        match (&self.next_run_text, self.status_class) {
            (Some(text), _) => text.clone(),
            (None, StatusClass::Disabled) => StatusClass::Disabled.label().to_string(),
            (None, StatusClass::Suspended) => StatusClass::Suspended.label().to_string(),
            (None, _) => NO_UPCOMING_RUN.to_string(),
        }
    }
}
