use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, InputMode, SimulateField},
    ui::{components::UiComponent, style::dim_unless_focused},
};

pub fn render_simulate(app: &App, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(20)])
        .split(area);

    let editing = app.mode == InputMode::Simulate;
    let form = &app.simulate;

    let mut lines: Vec<Line> = SimulateField::ALL
        .iter()
        .map(|field| {
            let focused = editing && form.focus == *field;
            let value = form.value(*field);
            let shown = match (value.is_empty(), focused) {
                (true, false) => "default".to_string(),
                (_, true) => format!("{}_", value),
                (false, false) => value,
            };
            Line::from(vec![
                Span::styled(format!("{:<21}", field.label()), Style::default().fg(Color::Gray)),
                Span::styled(shown, dim_unless_focused(focused, Style::default().fg(Color::Cyan))),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(if form.running {
        Line::from("Running...").fg(Color::Yellow)
    } else if editing {
        Line::from("Enter to run").fg(Color::DarkGray)
    } else {
        Line::from("Enter to edit").fg(Color::DarkGray)
    });

    let border = if editing { Color::Yellow } else { Color::DarkGray };
    Paragraph::new(lines)
        .block(
            Block::bordered()
                .title(" Simulation inputs ")
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border)),
        )
        .render(columns[0], buf);

    match &form.report {
        Some(report) => Paragraph::new(report.as_str())
            .block(
                Block::bordered()
                    .title(" What would run ")
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .scroll((form.scroll, 0))
            .render(columns[1], buf),
        None => UiComponent::empty_message("No simulation run yet", Some("What would run"))
            .render(columns[1], buf),
    }
}
