use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::{
    app::App,
    ui::components::UiComponent,
    view_model::{derive_sensor_view, SensorViewModel},
};

const SENSORS_PER_ROW: usize = 3;
const SENSOR_HEIGHT: u16 = 7;

pub fn render_sensors(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(status) = &app.status else {
        UiComponent::empty_message("Waiting for first status...", Some("Sensors")).render(area, buf);
        return;
    };
    if status.sensors.is_empty() {
        UiComponent::empty_message("No sensors configured", Some("Sensors")).render(area, buf);
        return;
    }

    let views: Vec<SensorViewModel> = status.sensors.iter().map(derive_sensor_view).collect();

    let num_rows = views.len().div_ceil(SENSORS_PER_ROW);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..num_rows).map(|_| Constraint::Length(SENSOR_HEIGHT)))
        .split(area);

    for (row_idx, chunk) in views.chunks(SENSORS_PER_ROW).enumerate() {
        let Some(row_area) = rows.get(row_idx) else { break };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..SENSORS_PER_ROW).map(|_| Constraint::Ratio(1, SENSORS_PER_ROW as u32)))
            .split(*row_area);
        for (view, cell) in chunk.iter().zip(cells.iter()) {
            render_sensor(view, *cell, buf);
        }
    }
}

fn render_sensor(view: &SensorViewModel, area: Rect, buf: &mut Buffer) {
    let border_color = match (&view.error_text, view.enabled) {
        (Some(_), _) => Color::Red,
        (None, true) => Color::Green,
        (None, false) => Color::DarkGray,
    };
    let block = Block::bordered()
        .title(format!(" {} ", view.name))
        .title_bottom(Line::from(format!(" {} ", view.sensor_type)).right_aligned())
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let mut lines = Vec::new();
    if !view.enabled {
        lines.push(Line::from("Disabled").italic().fg(Color::DarkGray));
    }
    match &view.error_text {
        Some(error) => lines.push(Line::from(error.clone()).fg(Color::Red)),
        None => lines.extend(view.items.iter().map(|item| {
            Line::from(vec![
                Span::styled(format!("{:<14}", item.label), Style::default().fg(Color::Gray)),
                Span::styled(item.value.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })),
    }

    Paragraph::new(lines).block(block).render(area, buf);
}
