pub mod types;
mod client;

use async_trait::async_trait;
use std::fmt::Debug;

pub use client::HttpControllerApi;
pub use types::*;

use crate::error::Result;

/// Write actions on a single valve. The queue action carries its duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValveAction {
    StartManual,
    Stop,
    Enable,
    Disable,
    Suspend,
    Resume,
    Queue { duration_minutes: f64 },
}

impl ValveAction {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ValveAction::StartManual => "start-manual",
            ValveAction::Stop => "stop",
            ValveAction::Enable => "enable",
            ValveAction::Disable => "disable",
            ValveAction::Suspend => "suspend",
            ValveAction::Resume => "resume",
            ValveAction::Queue { .. } => "queue",
        }
    }

    /// Actions that change which valves are eligible for scheduled runs, so
    /// the lookahead table has to be fetched again.
    pub fn affects_schedule(&self) -> bool {
        matches!(
            self,
            ValveAction::Enable | ValveAction::Disable | ValveAction::Suspend | ValveAction::Resume
        )
    }

    pub fn success_message(&self, valve: &str) -> String {
        match self {
            ValveAction::StartManual => format!("Valve {} started manually", valve),
            ValveAction::Stop => format!("Valve {} stopped", valve),
            ValveAction::Enable => format!("Valve {} enabled", valve),
            ValveAction::Disable => format!("Valve {} disabled", valve),
            ValveAction::Suspend => format!("Valve {} suspended", valve),
            ValveAction::Resume => format!("Valve {} resumed", valve),
            ValveAction::Queue { duration_minutes } => {
                format!("Valve {} queued for {} minutes", valve, duration_minutes)
            }
        }
    }
}

/// Everything the dashboard reads from or writes to the irrigation
/// controller.
#[async_trait]
pub trait ControllerApi: Send + Sync + Debug {
    async fn status(&self) -> Result<StatusSnapshot>;
    async fn queue(&self) -> Result<QueueSnapshot>;
    async fn next_runs(&self) -> Result<NextRunTable>;
    async fn config(&self) -> Result<ControllerConfig>;
    async fn valve_action(&self, valve: &str, action: ValveAction) -> Result<()>;
    async fn valve_detail(&self, valve: &str) -> Result<ValveDetail>;
    async fn create_schedule(&self, valve: &str, schedule: &Schedule) -> Result<()>;
    async fn update_schedule(&self, valve: &str, index: usize, schedule: &Schedule) -> Result<()>;
    async fn delete_schedule(&self, valve: &str, index: usize) -> Result<()>;
    async fn simulate(&self, request: &SimulationRequest) -> Result<String>;
}
