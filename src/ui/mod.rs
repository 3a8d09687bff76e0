pub mod components;
pub mod screens;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Widget},
};

use crate::{
    app::{App, InputMode, Tab},
    ui::components::UiComponent,
    view_model::derive_system_view,
};

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // System status
                Constraint::Length(1), // Tabs
                Constraint::Min(0),    // Screen
                Constraint::Length(3), // Key help
            ])
            .split(area);

        let system = self.status.as_ref().map(|s| derive_system_view(&s.system));
        UiComponent::status(system.as_ref(), &self.config.api.base_url).render(chunks[0], buf);

        Tabs::new(Tab::ALL.iter().enumerate().map(|(i, tab)| format!("{} {}", i + 1, tab.title())))
            .select(self.tab.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .divider("│")
            .render(chunks[1], buf);

        // Only the valves screen draws the chart; any other screen clears
        // the recorded geometry so pointer moves stop hitting it.
        if self.tab != Tab::Valves {
            self.chart_geometry = None;
            self.hovered = None;
        }

        match self.tab {
            Tab::Valves => screens::valves::render_valves(self, chunks[2], buf),
            Tab::Sensors => screens::sensors::render_sensors(self, chunks[2], buf),
            Tab::Queue => screens::queue::render_queue(self, chunks[2], buf),
            Tab::Config => screens::config::render_config(self, chunks[2], buf),
            Tab::Simulate => screens::simulate::render_simulate(self, chunks[2], buf),
        }

        UiComponent::help(help_text(self)).render(chunks[3], buf);

        render_modal(self, area, buf);

        if let Some(toast) = &self.toast {
            let toast_area = toast_rect(&toast.message, chunks[2]);
            Clear.render(toast_area, buf);
            UiComponent::toast(toast).render(toast_area, buf);
        }
    }
}

fn help_text(app: &App) -> &'static str {
    match (&app.mode, app.tab) {
        (InputMode::QueueDuration { .. }, _) => "digits: minutes | Enter: queue | Esc: cancel",
        (InputMode::ConfirmDelete { .. }, _) => "y: delete | n/Esc: keep",
        (InputMode::EditSchedule { .. }, _) => {
            "Tab/↑↓: field | Space: toggle | ←→: day/season | Enter: save | Esc: cancel"
        }
        (InputMode::Simulate, _) => "Tab/↑↓: field | Space: cycle | Enter: run | Esc: done",
        (InputMode::Normal, Tab::Valves) => {
            "j/k: valve | Enter: schedules | s/x: start/stop | u: queue | t: enable | p: suspend | [/]: schedule | e/n/D: edit/new/delete | r: refresh | q: quit"
        }
        (InputMode::Normal, Tab::Simulate) => "Enter/i: edit inputs | j/k: scroll report | Tab: next tab | q: quit",
        (InputMode::Normal, _) => "Tab/←→ or 1-5: switch tab | r: refresh | q: quit",
    }
}

fn render_modal(app: &App, area: Rect, buf: &mut Buffer) {
    let (title, lines) = match &app.mode {
        InputMode::QueueDuration { valve, input } => (
            " Queue run ",
            vec![
                Line::from(format!("Queue {} for how many minutes?", valve)),
                Line::from(""),
                Line::from(format!("> {}_", input)).style(Style::default().fg(Color::Cyan)),
            ],
        ),
        InputMode::ConfirmDelete { valve, index } => (
            " Delete schedule ",
            vec![
                Line::from(format!("Delete schedule #{} of {}?", index + 1, valve)),
                Line::from(""),
                Line::from("y / n").style(Style::default().fg(Color::Yellow)),
            ],
        ),
        _ => return,
    };

    let popup = centered_rect(50, 25, area);
    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(ratatui::layout::Alignment::Center)
        .render(popup, buf);
}

/// Bottom-right corner of the screen area, sized to the message.
fn toast_rect(message: &str, area: Rect) -> Rect {
    let width = (message.chars().count() as u16 + 4).max(20).min(area.width);
    let height = 3.min(area.height);
    Rect {
        x: area.right().saturating_sub(width),
        y: area.bottom().saturating_sub(height),
        width,
        height,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
