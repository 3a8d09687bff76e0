use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::{app::App, config::DashboardConfig, ui::components::UiComponent};

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<22}", label), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

fn on_off(flag: bool) -> String {
    if flag { "on".to_string() } else { "off".to_string() }
}

pub fn render_config(app: &App, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    match &app.controller_config {
        Some(config) => {
            let mut lines = vec![
                row("Timezone", config.timezone.clone()),
                row(
                    "Location",
                    format!("{:.4}, {:.4}", config.location.latitude, config.location.longitude),
                ),
                row("Max concurrent valves", config.max_concurrent_valves.to_string()),
                row("Valves", config.valve_count.to_string()),
                row("Sensors", config.sensor_count.to_string()),
                row("Telemetry", on_off(config.telemetry_enabled)),
                row("MQTT", on_off(config.mqtt_enabled)),
            ];
            if !config.uv_adjustments.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("UV adjustments", Style::default().fg(Color::Yellow))));
                lines.extend(config.uv_adjustments.iter().map(|adj| {
                    row(&format!("  UV ≤ {}", adj.max_uv_index), format!("× {}", adj.multiplier))
                }));
            }
            Paragraph::new(lines)
                .block(
                    Block::bordered()
                        .title(" Controller ")
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .render(columns[0], buf);
        }
        None => UiComponent::empty_message("Loading controller configuration...", Some("Controller"))
            .render(columns[0], buf),
    }

    render_dashboard_settings(&app.config, columns[1], buf);
}

fn render_dashboard_settings(config: &DashboardConfig, area: Rect, buf: &mut Buffer) {
    let timeout = config
        .api
        .request_timeout()
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none".to_string());

    let lines = vec![
        row("API", config.api.base_url.clone()),
        row("Request timeout", timeout),
        row("Status every", format!("{}s", config.polling.fast_interval_secs)),
        row("Next runs every", format!("{}s", config.polling.slow_interval_secs)),
        row("Single flight", on_off(config.polling.single_flight)),
        row("Stale valves", format!("{:?}", config.ui.stale_entities).to_lowercase()),
        row("Log dir", config.log_dir.0.display().to_string()),
    ];

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .title(" Dashboard ")
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(area, buf);
}
