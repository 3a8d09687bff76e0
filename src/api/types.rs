// src/api/types.rs
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ----------------------------------------------------------------------------
// STATUS
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub system: SystemState,
    #[serde(default)]
    pub valves: Vec<ValveState>,
    #[serde(default)]
    pub sensors: Vec<SensorState>,
    #[serde(default)]
    pub waterflow: Option<WaterflowState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub status: String,
    #[serde(default, with = "flexible_time::option")]
    pub current_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
    #[serde(default)]
    pub fault: Option<String>,
    #[serde(default)]
    pub uptime_minutes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveState {
    pub name: String,
    pub enabled: bool,
    pub is_open: bool,
    /// Only present on schema versions that support suspension.
    #[serde(default)]
    pub suspended: Option<bool>,
    /// Server's "job in progress" flag, absent on older schemas.
    #[serde(default)]
    pub handled: Option<bool>,
    #[serde(default)]
    pub seconds_remain: i64,
    #[serde(default)]
    pub seconds_duration: i64,
    #[serde(default)]
    pub seconds_daily: i64,
    #[serde(default)]
    pub liters_daily: f64,
    /// Last-run meters; older schemas omit them.
    #[serde(default)]
    pub seconds_last: Option<i64>,
    #[serde(default)]
    pub liters_last: Option<f64>,
}

impl ValveState {
    pub fn is_suspended(&self) -> bool {
        self.suspended.unwrap_or(false)
    }

    /// A job is running (possibly paused by suspension).
    pub fn run_active(&self) -> bool {
        match self.handled {
            Some(handled) => handled,
            None => self.seconds_duration > 0 && self.seconds_remain > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub telemetry: SensorTelemetry,
    #[serde(default)]
    pub factor: Option<f64>,
    #[serde(default)]
    pub should_disable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorTelemetry {
    #[serde(default)]
    pub uv_index: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub rain: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterflowState {
    pub enabled: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub flow_rate: f64,
    #[serde(default)]
    pub leak_detection_enabled: bool,
    #[serde(default, with = "flexible_time::option")]
    pub last_update: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub history: Vec<FlowSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSample {
    #[serde(with = "flexible_time")]
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
}

// ----------------------------------------------------------------------------
// QUEUE / NEXT RUNS
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    #[serde(default)]
    pub jobs: Vec<QueueJob>,
    #[serde(default)]
    pub queue_size: Option<usize>,
}

impl QueueSnapshot {
    pub fn size(&self) -> usize {
        self.queue_size.unwrap_or(self.jobs.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueJob {
    pub valve_name: String,
    pub duration_minutes: f64,
    #[serde(default)]
    pub is_scheduled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextRunEntry {
    #[serde(alias = "schedule_time_iso", with = "flexible_time")]
    pub schedule_time: DateTime<FixedOffset>,
}

pub type NextRunTable = HashMap<String, NextRunEntry>;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NextRunsResponse {
    #[serde(default)]
    pub next_runs: NextRunTable,
}

// ----------------------------------------------------------------------------
// VALVE DETAIL / SCHEDULES
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveDetail {
    pub name: String,
    #[serde(rename = "type", default)]
    pub valve_type: String,
    #[serde(default)]
    pub sensor_name: Option<String>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBase {
    Fixed,
    Sunrise,
    Sunset,
}

impl TimeBase {
    pub fn next(self) -> Self {
        match self {
            TimeBase::Fixed => TimeBase::Sunrise,
            TimeBase::Sunrise => TimeBase::Sunset,
            TimeBase::Sunset => TimeBase::Fixed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBase::Fixed => "fixed",
            TimeBase::Sunrise => "sunrise",
            TimeBase::Sunset => "sunset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub time_based_on: TimeBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_minutes: Option<i64>,
    pub duration: u32,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub enable_uv_adjustments: bool,
}

impl Schedule {
    /// One-line description used by the detail panel.
    pub fn start_description(&self) -> String {
        match self.time_based_on {
            TimeBase::Fixed => format!(
                "at {}",
                self.fixed_start_time.as_deref().unwrap_or("--:--")
            ),
            base => {
                let offset = self.offset_minutes.unwrap_or(0);
                if offset == 0 {
                    base.as_str().to_string()
                } else {
                    format!("{} {:+} min", base.as_str(), offset)
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// CONFIG / SIMULATION
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub timezone: String,
    pub location: Location,
    pub max_concurrent_valves: u32,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default)]
    pub mqtt_enabled: bool,
    #[serde(default)]
    pub valve_count: u32,
    #[serde(default)]
    pub sensor_count: u32,
    #[serde(default)]
    pub uv_adjustments: Vec<UvAdjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvAdjustment {
    pub max_uv_index: f64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub uv: Option<f64>,
    pub season: Option<String>,
    pub rain: Option<bool>,
    pub days: Option<u32>,
}

impl SimulationRequest {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.date.as_ref().filter(|s| !s.is_empty()) {
            params.push(("date", date.clone()));
        }
        if let Some(time) = self.time.as_ref().filter(|s| !s.is_empty()) {
            params.push(("time", time.clone()));
        }
        if let Some(uv) = self.uv {
            params.push(("uv", uv.to_string()));
        }
        if let Some(season) = self.season.as_ref().filter(|s| !s.is_empty()) {
            params.push(("season", season.clone()));
        }
        if let Some(rain) = self.rain {
            params.push(("rain", rain.to_string()));
        }
        if let Some(days) = self.days.filter(|d| *d > 1) {
            params.push(("days", days.to_string()));
        }
        params
    }
}

fn default_true() -> bool {
    true
}

/// Instants arrive either as RFC 3339 strings, as naive ISO strings in the
/// controller's local time, or as unix seconds.
pub(crate) mod flexible_time {
    use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Epoch(f64),
    }

    pub fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed);
        }
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.fixed_offset())
    }

    fn from_raw<E: de::Error>(raw: Raw) -> Result<DateTime<FixedOffset>, E> {
        match raw {
            Raw::Text(text) => parse(&text)
                .ok_or_else(|| E::custom(format!("unrecognised timestamp '{}'", text))),
            Raw::Epoch(secs) => Utc
                .timestamp_opt(secs.trunc() as i64, 0)
                .single()
                .map(|utc| utc.fixed_offset())
                .ok_or_else(|| E::custom(format!("timestamp {} out of range", secs))),
        }
    }

    pub fn serialize<S: Serializer>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error> {
        from_raw(Raw::deserialize(deserializer)?)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&v.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
            match Option::<Raw>::deserialize(deserializer)? {
                Some(raw) => from_raw(raw).map(Some),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_tolerates_missing_optional_blocks() {
        let status: StatusSnapshot = serde_json::from_value(json!({
            "system": { "status": "OK" },
            "valves": [{
                "name": "Lawn",
                "enabled": true,
                "is_open": false,
                "seconds_daily": 600,
                "liters_daily": 42.5
            }],
            "sensors": [{ "name": "uv", "type": "openweathermap" }]
        }))
        .unwrap();

        assert!(status.waterflow.is_none());
        let valve = &status.valves[0];
        assert_eq!(valve.suspended, None);
        assert!(!valve.is_suspended());
        assert!(!valve.run_active());
        assert_eq!(status.sensors[0].telemetry.uv_index, None);
        assert!(status.sensors[0].enabled);
    }

    #[test]
    fn run_active_prefers_server_flag() {
        let mut valve: ValveState = serde_json::from_value(json!({
            "name": "Beds", "enabled": true, "is_open": false,
            "seconds_remain": 300, "seconds_duration": 600
        }))
        .unwrap();
        assert!(valve.run_active());

        valve.handled = Some(false);
        assert!(!valve.run_active());
    }

    #[test]
    fn next_runs_accept_iso_alias() {
        let parsed: NextRunsResponse = serde_json::from_value(json!({
            "next_runs": {
                "Lawn": { "schedule_time_iso": "2026-10-20T06:15:00+02:00" }
            }
        }))
        .unwrap();
        let entry = &parsed.next_runs["Lawn"];
        assert_eq!(entry.schedule_time.to_rfc3339(), "2026-10-20T06:15:00+02:00");
    }

    #[test]
    fn flow_samples_accept_epoch_seconds() {
        let sample: FlowSample =
            serde_json::from_value(json!({ "timestamp": 1_760_000_000, "value": 3.5 })).unwrap();
        assert_eq!(sample.timestamp.timestamp(), 1_760_000_000);
    }

    #[test]
    fn schedule_serializes_only_relevant_start_fields() {
        let schedule = Schedule {
            time_based_on: TimeBase::Sunrise,
            fixed_start_time: None,
            offset_minutes: Some(-30),
            duration: 15,
            seasons: vec!["Summer".into()],
            days: vec!["Mon".into(), "Thu".into()],
            enable_uv_adjustments: true,
        };
        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value["time_based_on"], "sunrise");
        assert!(value.get("fixed_start_time").is_none());
        assert_eq!(schedule.start_description(), "sunrise -30 min");
    }

    #[test]
    fn simulation_omits_single_day() {
        let request = SimulationRequest {
            date: Some("2026-07-01".into()),
            rain: Some(false),
            days: Some(1),
            ..Default::default()
        };
        assert_eq!(
            request.query_pairs(),
            vec![("date", "2026-07-01".to_string()), ("rain", "false".to_string())]
        );
    }
}
