pub mod config;
pub mod queue;
pub mod sensors;
pub mod simulate;
pub mod valves;
