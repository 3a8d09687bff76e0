mod ring_buffer;
mod hit_test;
mod render;

use chrono::{DateTime, FixedOffset};
use ratatui::style::Color;

pub use hit_test::{ChartGeometry, Tooltip, TOOLTIP_WIDTH};
pub use render::FlowChart;
pub use ring_buffer::TimeSeriesBuffer;

/// Number of columns / samples the flow chart always shows.
pub const CHART_CAPACITY: usize = 120;

/// Lowest vertical ceiling, so low-flow noise does not fill the chart.
pub const MIN_SCALE_CEILING: f64 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSample {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTier {
    Low,
    Medium,
    High,
}

impl ValueTier {
    pub fn for_value(value: f64) -> Self {
        if value <= 5.0 {
            ValueTier::Low
        } else if value <= 10.0 {
            ValueTier::Medium
        } else {
            ValueTier::High
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ValueTier::Low => Color::Rgb(79, 195, 247),
            ValueTier::Medium => Color::Rgb(255, 202, 40),
            ValueTier::High => Color::Rgb(239, 83, 80),
        }
    }
}
