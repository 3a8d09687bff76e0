use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Row, Table, Widget},
};

use crate::{app::App, ui::components::UiComponent};

pub fn render_queue(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(queue) = &app.queue else {
        UiComponent::empty_message("Waiting for first status...", Some("Queue")).render(area, buf);
        return;
    };
    if queue.jobs.is_empty() {
        UiComponent::empty_message("Queue is empty", Some("Queue")).render(area, buf);
        return;
    }

    let rows = queue.jobs.iter().enumerate().map(|(i, job)| {
        let (kind, color) = if job.is_scheduled {
            ("scheduled", Color::Cyan)
        } else {
            ("manual", Color::Magenta)
        };
        Row::new(vec![
            format!("{}", i + 1),
            job.valve_name.clone(),
            format!("{:.1} min", job.duration_minutes),
            kind.to_string(),
        ])
        .style(Style::default().fg(color))
    });

    Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec!["#", "Valve", "Duration", "Source"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::bordered()
            .title(format!(" Queue ({}) ", queue.size()))
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .render(area, buf);
}
