// src/polling/mod.rs
//! Fast and slow refresh cycles against the controller.

mod sequence_gate;
mod session;

pub use sequence_gate::SequenceGate;
pub use session::PollingSession;

use std::time::Duration;

use crate::config::PollingConfig;

/// The two independent refresh cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Status and queue.
    Fast,
    /// Next-run lookahead.
    Slow,
}

impl Cycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cycle::Fast => "fast",
            Cycle::Slow => "slow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingSettings {
    pub fast_interval: Duration,
    pub slow_interval: Duration,
    /// Skip a tick while the same cycle still has a request in flight.
    pub single_flight: bool,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            fast_interval: Duration::from_secs(5),
            slow_interval: Duration::from_secs(120),
            single_flight: false,
        }
    }
}

impl From<&PollingConfig> for PollingSettings {
    fn from(config: &PollingConfig) -> Self {
        Self {
            fast_interval: Duration::from_secs(config.fast_interval_secs.max(1)),
            slow_interval: Duration::from_secs(config.slow_interval_secs.max(1)),
            single_flight: config.single_flight,
        }
    }
}
