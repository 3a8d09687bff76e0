use crate::{
    api::SystemState,
    util::time_format::format_uptime,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemLevel {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemViewModel {
    pub level: SystemLevel,
    pub status_text: String,
    pub fault: Option<String>,
    pub season: Option<String>,
    pub sun: Option<String>,
    pub uptime: Option<String>,
}

pub fn derive_system_view(system: &SystemState) -> SystemViewModel {
    let (level, status_text) = if system.status == "OK" {
        (SystemLevel::Ok, "System OK".to_string())
    } else if system.status.contains("Err") {
        (SystemLevel::Error, system.status.clone())
    } else {
        (SystemLevel::Warning, system.status.clone())
    };

    let sun = match (&system.sunrise, &system.sunset) {
        (Some(rise), Some(set)) => Some(format!("☀ {} – {}", rise, set)),
        (Some(rise), None) => Some(format!("☀ {}", rise)),
        (None, Some(set)) => Some(format!("☾ {}", set)),
        (None, None) => None,
    };

    SystemViewModel {
        level,
        status_text,
        fault: system.fault.clone().filter(|f| !f.is_empty()),
        season: system.season.clone(),
        sun,
        uptime: system.uptime_minutes.map(format_uptime),
    }
}
