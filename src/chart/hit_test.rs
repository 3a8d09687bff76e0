use ratatui::layout::{Position, Rect};
use std::ops::Range;

use crate::util::time_format::format_sample_time;

use super::{TimeSeriesBuffer, CHART_CAPACITY};

pub const TOOLTIP_WIDTH: u16 = 16;
const TOOLTIP_HEIGHT: u16 = 4;

/// Cell geometry of the plot area as of the last draw. Rebuilt on every
/// draw, so a resize rescales the columns to the new grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub plot: Rect,
    pub column_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub column: usize,
    pub area: Rect,
    pub time_text: String,
    pub value_text: String,
}

impl ChartGeometry {
    pub fn new(plot: Rect) -> Self {
        Self {
            plot,
            column_width: plot.width as f64 / CHART_CAPACITY as f64,
        }
    }

    /// `floor(x / column_width)` relative to the plot, or `None` when the
    /// pointer is outside the plot.
    pub fn column_at(&self, pointer: Position) -> Option<usize> {
        if !self.plot.contains(pointer) || self.column_width <= 0.0 {
            return None;
        }
        let relative = (pointer.x - self.plot.x) as f64;
        let column = (relative / self.column_width).floor() as usize;
        Some(column.min(CHART_CAPACITY - 1))
    }

    /// Sample column drawn in the given plot cell.
    pub fn column_for_cell(&self, cell_x: u16) -> usize {
        self.column_at(Position::new(cell_x, self.plot.y)).unwrap_or(0)
    }

    /// Every sample column that falls inside the given plot cell. More than
    /// one when the plot is narrower than the buffer.
    pub fn columns_for_cell(&self, cell_x: u16) -> Range<usize> {
        let start = self.column_for_cell(cell_x);
        if self.column_width <= 0.0 {
            return start..start + 1;
        }
        let relative = cell_x.saturating_sub(self.plot.x) as f64 + 1.0;
        let end = ((relative / self.column_width).floor() as usize).min(CHART_CAPACITY);
        start..end.max(start + 1)
    }

    /// Tooltip for the hovered sample, or `None` when the column is empty
    /// or the pointer is off the chart.
    pub fn hit_test(&self, pointer: Position, buffer: &TimeSeriesBuffer) -> Option<Tooltip> {
        let column = self.column_at(pointer)?;
        let sample = buffer.get(column)?;

        let width = TOOLTIP_WIDTH.min(self.plot.width);
        let height = TOOLTIP_HEIGHT.min(self.plot.height);
        let right_edge = self.plot.x + self.plot.width;

        // Right of the pointer unless that clips, then left of it.
        let x = if pointer.x + 1 + width <= right_edge {
            pointer.x + 1
        } else {
            pointer.x.saturating_sub(width).max(self.plot.x)
        };

        Some(Tooltip {
            column,
            area: Rect::new(x, self.plot.y, width, height),
            time_text: format_sample_time(&sample.timestamp),
            value_text: format!("{:.1} L/min", sample.value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FlowSample;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn buffer_with(count: usize) -> TimeSeriesBuffer {
        let t0 = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2026, 10, 19, 6, 0, 0).unwrap();
        let history: Vec<FlowSample> = (0..count)
            .map(|i| FlowSample {
                timestamp: t0 + Duration::minutes(i as i64),
                value: i as f64 / 2.0,
            })
            .collect();
        TimeSeriesBuffer::from_history(&history)
    }

    #[test]
    fn pointer_maps_to_column_by_floor() {
        let geometry = ChartGeometry::new(Rect::new(10, 5, 240, 12));
        assert_eq!(geometry.column_width, 2.0);
        assert_eq!(geometry.column_at(Position::new(10, 5)), Some(0));
        assert_eq!(geometry.column_at(Position::new(11, 8)), Some(0));
        assert_eq!(geometry.column_at(Position::new(10 + 118, 8)), Some(59));
        assert_eq!(geometry.column_at(Position::new(10 + 119, 8)), Some(59));
        assert_eq!(geometry.column_at(Position::new(249, 8)), Some(119));
        assert_eq!(geometry.column_at(Position::new(9, 8)), None);
        assert_eq!(geometry.column_at(Position::new(20, 17)), None);
    }

    #[test]
    fn populated_column_shows_its_sample() {
        let geometry = ChartGeometry::new(Rect::new(0, 0, 240, 10));
        let buffer = buffer_with(100);

        let tooltip = geometry.hit_test(Position::new(118, 4), &buffer).unwrap();
        assert_eq!(tooltip.column, 59);
        assert_eq!(tooltip.time_text, "06:59:00");
        assert_eq!(tooltip.value_text, "29.5 L/min");
        assert_eq!(tooltip.area.x, 119);
    }

    #[test]
    fn empty_trailing_column_hides_tooltip() {
        let geometry = ChartGeometry::new(Rect::new(0, 0, 240, 10));
        let buffer = buffer_with(100);
        assert!(geometry.hit_test(Position::new(230, 4), &buffer).is_none());
        assert!(geometry.hit_test(Position::new(300, 4), &buffer).is_none());
    }

    #[test]
    fn tooltip_flips_left_at_right_edge() {
        let geometry = ChartGeometry::new(Rect::new(0, 0, 120, 10));
        let buffer = buffer_with(120);
        let tooltip = geometry.hit_test(Position::new(115, 2), &buffer).unwrap();
        assert_eq!(tooltip.column, 115);
        assert_eq!(tooltip.area.x, 115 - TOOLTIP_WIDTH);
        assert!(tooltip.area.x + tooltip.area.width <= 120);
    }

    #[test]
    fn narrow_plot_shares_cells_between_samples() {
        let geometry = ChartGeometry::new(Rect::new(0, 0, 60, 10));
        assert_eq!(geometry.column_at(Position::new(30, 0)), Some(60));
        assert_eq!(geometry.column_for_cell(59), 118);
        assert_eq!(geometry.columns_for_cell(0), 0..2);
        assert_eq!(geometry.columns_for_cell(59), 118..120);

        let wide = ChartGeometry::new(Rect::new(0, 0, 240, 10));
        assert_eq!(wide.columns_for_cell(0), 0..1);
        assert_eq!(wide.columns_for_cell(1), 0..1);
    }
}
