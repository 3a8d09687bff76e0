use ratatui::{
    layout::Alignment,
    prelude::{Color, Stylize, Style},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::UiComponent;

impl UiComponent {
    /// Placeholder for a pane with nothing to show yet. With a title the
    /// pane keeps its border so the layout does not jump once data arrives.
    pub fn empty_message<'a>(text: &'a str, title: Option<&'a str>) -> Paragraph<'a> {
        let mut block = Block::default()
            .padding(Padding::symmetric(1, 1));

        if let Some(title) = title {
            block = block
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
        }

        Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::Gray).italic())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
    }
}
