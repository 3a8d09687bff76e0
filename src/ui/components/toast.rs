use ratatui::{
    layout::Alignment,
    prelude::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{app::Toast, ui::style::toast_color};

use super::UiComponent;

impl UiComponent {
    pub fn toast(toast: &Toast) -> Paragraph {
        let color = toast_color(toast.kind);
        Paragraph::new(toast.message.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
            )
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }
}
