use crate::api::SensorState;

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorViewModel {
    pub name: String,
    pub sensor_type: String,
    pub enabled: bool,
    /// Set when the sensor failed to report; replaces all telemetry items.
    pub error_text: Option<String>,
    pub items: Vec<TelemetryItem>,
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes".to_string() } else { "No".to_string() }
}

pub fn derive_sensor_view(sensor: &SensorState) -> SensorViewModel {
    let mut items = Vec::new();
    let mut error_text = None;

    if sensor.error {
        error_text = Some("Sensor Error - Unable to retrieve data".to_string());
    } else {
        let telemetry = &sensor.telemetry;
        if let Some(uv) = telemetry.uv_index {
            items.push(TelemetryItem { label: "UV Index", value: format!("{:.1}", uv) });
        }
        if let Some(temperature) = telemetry.temperature {
            items.push(TelemetryItem { label: "Temperature", value: format!("{:.1}°C", temperature) });
        }
        if let Some(rain) = telemetry.rain {
            items.push(TelemetryItem { label: "Rain", value: yes_no(rain) });
        }
        if let Some(factor) = sensor.factor {
            items.push(TelemetryItem { label: "Factor", value: format!("{:.2}x", factor) });
        }
        if let Some(should_disable) = sensor.should_disable {
            items.push(TelemetryItem { label: "Should Disable", value: yes_no(should_disable) });
        }
    }

    SensorViewModel {
        name: sensor.name.clone(),
        sensor_type: sensor.sensor_type.clone(),
        enabled: sensor.enabled,
        error_text,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SensorTelemetry;

    fn sensor() -> SensorState {
        SensorState {
            name: "weather".to_string(),
            sensor_type: "openweathermap".to_string(),
            enabled: true,
            error: false,
            telemetry: SensorTelemetry::default(),
            factor: None,
            should_disable: None,
        }
    }

    #[test]
    fn absent_fields_produce_no_items() {
        let mut s = sensor();
        s.telemetry.temperature = Some(21.5);
        s.factor = Some(1.25);

        let vm = derive_sensor_view(&s);
        assert_eq!(
            vm.items,
            vec![
                TelemetryItem { label: "Temperature", value: "21.5°C".to_string() },
                TelemetryItem { label: "Factor", value: "1.25x".to_string() },
            ]
        );
        assert!(vm.error_text.is_none());
    }

    #[test]
    fn zero_telemetry_is_shown_not_dropped() {
        let mut s = sensor();
        s.telemetry.uv_index = Some(0.0);
        s.telemetry.rain = Some(false);
        let vm = derive_sensor_view(&s);
        assert_eq!(vm.items[0].value, "0.0");
        assert_eq!(vm.items[1].value, "No");
    }

    #[test]
    fn error_replaces_telemetry() {
        let mut s = sensor();
        s.error = true;
        s.telemetry.uv_index = Some(7.0);
        let vm = derive_sensor_view(&s);
        assert!(vm.items.is_empty());
        assert!(vm.error_text.is_some());
    }
}
