use crate::api::FlowSample;

use super::{ChartSample, CHART_CAPACITY, MIN_SCALE_CEILING};

/// The newest `CHART_CAPACITY` flow samples, oldest in slot 0. The server
/// does the windowing; this only mirrors its latest window.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBuffer {
    slots: Vec<Option<ChartSample>>,
    populated: usize,
}

impl Default for TimeSeriesBuffer {
    fn default() -> Self {
        Self {
            slots: vec![None; CHART_CAPACITY],
            populated: 0,
        }
    }
}

impl TimeSeriesBuffer {
    pub fn from_history(history: &[FlowSample]) -> Self {
        let mut buffer = Self::default();
        buffer.replace_from(history);
        buffer
    }

    /// Replace the whole window. Extra samples beyond capacity drop off the
    /// old end; negative readings are stored as zero.
    pub fn replace_from(&mut self, history: &[FlowSample]) {
        let skip = history.len().saturating_sub(CHART_CAPACITY);
        let recent = &history[skip..];

        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        for (slot, sample) in self.slots.iter_mut().zip(recent) {
            *slot = Some(ChartSample {
                timestamp: sample.timestamp,
                value: sample.value.max(0.0),
            });
        }
        self.populated = recent.len();
    }

    pub fn get(&self, index: usize) -> Option<&ChartSample> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.populated
    }

    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    pub fn latest(&self) -> Option<&ChartSample> {
        self.populated.checked_sub(1).and_then(|i| self.get(i))
    }

    /// `max(15, largest value)`.
    pub fn scale_ceiling(&self) -> f64 {
        self.slots
            .iter()
            .flatten()
            .map(|s| s.value)
            .fold(MIN_SCALE_CEILING, f64::max)
    }
}
