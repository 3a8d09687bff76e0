use ratatui::{
    layout::Alignment,
    prelude::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{ui::style::system_color, view_model::SystemViewModel};

use super::UiComponent;

impl UiComponent {
    /// Header line with the controller's overall health.
    pub fn status(system: Option<&SystemViewModel>, base_url: &str) -> Paragraph<'static> {
        let line = match system {
            Some(system) => {
                let color = system_color(system.level);
                let mut spans = vec![Span::styled(
                    system.status_text.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )];
                if let Some(fault) = &system.fault {
                    spans.push(Span::styled(format!("  ⚠ {}", fault), Style::default().fg(Color::Red)));
                }
                for part in [&system.season, &system.sun, &system.uptime].into_iter().flatten() {
                    spans.push(Span::styled(format!("  │  {}", part), Style::default().fg(Color::Gray)));
                }
                Line::from(spans)
            }
            None => Line::from(Span::styled(
                format!("Connecting to {} ...", base_url),
                Style::default().fg(Color::DarkGray),
            )),
        };

        Paragraph::new(line)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Irrigation ")
            )
            .alignment(Alignment::Center)
    }
}
