use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::{ChartGeometry, TimeSeriesBuffer, Tooltip, ValueTier};

/// Partial-cell bar tops, in eighths.
const EIGHTHS: [&str; 8] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇"];
const FULL: &str = "█";

/// Two-layer bar chart over a [`TimeSeriesBuffer`]: a background column in
/// every slot and a tier-colored bar for each positive sample.
pub struct FlowChart<'a> {
    buffer: &'a TimeSeriesBuffer,
    tooltip: Option<&'a Tooltip>,
}

impl<'a> FlowChart<'a> {
    pub fn new(buffer: &'a TimeSeriesBuffer) -> Self {
        Self { buffer, tooltip: None }
    }

    pub fn tooltip(mut self, tooltip: Option<&'a Tooltip>) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Darker at the top, lighter toward the baseline.
    fn background_color(row: u16, height: u16) -> Color {
        let t = if height <= 1 { 1.0 } else { row as f64 / (height - 1) as f64 };
        let shade = |from: f64, to: f64| (from + (to - from) * t).round() as u8;
        Color::Rgb(shade(24.0, 44.0), shade(30.0, 58.0), shade(38.0, 72.0))
    }

    fn render_background(area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            let style = Style::default().bg(Self::background_color(row, area.height));
            for x in area.left()..area.right() {
                buf[(x, area.y + row)].set_symbol(" ").set_style(style);
            }
        }
    }

    fn render_bar(x: u16, area: Rect, buf: &mut Buffer, value: f64, ceiling: f64) {
        let eighths = ((value / ceiling) * area.height as f64 * 8.0).round() as u32;
        // A positive reading is always at least a sliver.
        let eighths = eighths.clamp(1, area.height as u32 * 8);
        let full_rows = (eighths / 8) as u16;
        let remainder = (eighths % 8) as usize;

        let color = ValueTier::for_value(value).color();
        let bottom = area.bottom() - 1;

        for i in 0..full_rows {
            buf[(x, bottom - i)].set_symbol(FULL).set_fg(color);
        }
        if remainder > 0 && full_rows < area.height {
            buf[(x, bottom - full_rows)].set_symbol(EIGHTHS[remainder]).set_fg(color);
        }
    }

    fn render_tooltip(tooltip: &Tooltip, buf: &mut Buffer) {
        Clear.render(tooltip.area, buf);
        Paragraph::new(vec![
            Line::from(tooltip.time_text.clone()),
            Line::from(tooltip.value_text.clone()),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .render(tooltip.area, buf);
    }
}

impl Widget for FlowChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let geometry = ChartGeometry::new(area);
        let ceiling = self.buffer.scale_ceiling();

        Self::render_background(area, buf);

        // Samples sharing a cell draw as their peak.
        for x in area.left()..area.right() {
            let peak = geometry
                .columns_for_cell(x)
                .filter_map(|column| self.buffer.get(column))
                .map(|sample| sample.value)
                .fold(0.0, f64::max);
            if peak > 0.0 {
                Self::render_bar(x, area, buf, peak, ceiling);
            }
        }

        if let Some(tooltip) = self.tooltip {
            Self::render_tooltip(tooltip, buf);
        }
    }
}
