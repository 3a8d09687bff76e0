// Background round-trips. Each task reports back through the event channel
// and never touches app state.
use crate::{
    api::{Schedule, SimulationRequest, ValveAction},
    event::{AppEvent, Event, ScheduleChange},
    log_info,
};

use super::App;

impl App {
    fn spawn_reporting<F>(&self, task: F)
    where
        F: std::future::Future<Output = AppEvent> + Send + 'static,
    {
        let sender = self.events.sender();
        tokio::spawn(async move {
            let event = task.await;
            let _ = sender.send(Event::App(event));
        });
    }

    pub fn spawn_valve_action(&self, valve: &str, action: ValveAction) {
        log_info!("Valve {}: {}", valve, action.path_segment());
        let api = self.api.clone();
        let valve = valve.to_string();
        self.spawn_reporting(async move {
            let result = api.valve_action(&valve, action).await;
            AppEvent::ActionFinished { valve, action, result }
        });
    }

    pub fn spawn_detail_load(&self, valve: &str) {
        let api = self.api.clone();
        let valve = valve.to_string();
        self.spawn_reporting(async move {
            let result = api.valve_detail(&valve).await;
            AppEvent::DetailLoaded { valve, result }
        });
    }

    pub fn spawn_schedule_save(&self, valve: &str, index: Option<usize>, schedule: Schedule) {
        let api = self.api.clone();
        let valve = valve.to_string();
        self.spawn_reporting(async move {
            let (change, result) = match index {
                Some(index) => (
                    ScheduleChange::Updated(index),
                    api.update_schedule(&valve, index, &schedule).await,
                ),
                None => (ScheduleChange::Created, api.create_schedule(&valve, &schedule).await),
            };
            AppEvent::ScheduleChanged { valve, change, result }
        });
    }

    pub fn spawn_schedule_delete(&self, valve: &str, index: usize) {
        let api = self.api.clone();
        let valve = valve.to_string();
        self.spawn_reporting(async move {
            let result = api.delete_schedule(&valve, index).await;
            AppEvent::ScheduleChanged {
                valve,
                change: ScheduleChange::Deleted(index),
                result,
            }
        });
    }

    pub fn spawn_config_load(&self) {
        let api = self.api.clone();
        self.spawn_reporting(async move { AppEvent::ConfigLoaded(api.config().await) });
    }

    pub fn spawn_simulation(&self, request: SimulationRequest) {
        let api = self.api.clone();
        self.spawn_reporting(async move { AppEvent::SimulationFinished(api.simulate(&request).await) });
    }
}
