mod handle_app_event;
mod handle_key_events;
mod handle_mouse_event;
mod spawn;
mod simulate_form;

pub use simulate_form::{SimulateField, SimulateForm};

use chrono::Local;
use color_eyre::Result;
use ratatui::{
    crossterm::event::{Event as CrosstermEvent, KeyEventKind},
    layout::Position,
    DefaultTerminal,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    api::{ControllerApi, ControllerConfig, NextRunTable, QueueSnapshot, StatusSnapshot, ValveDetail},
    chart::{ChartGeometry, TimeSeriesBuffer, Tooltip},
    config::DashboardConfig,
    event::{Event, EventHandler},
    log_info,
    polling::{PollingSession, PollingSettings, SequenceGate},
    reconcile::{PanelContent, ReconcileReport, VisualTree},
    session::{ScheduleEditSession, ScheduleEditStateMachine, ScheduleSlot, SessionIntent},
    view_model::derive_valve_views,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Valves,
    Sensors,
    Queue,
    Config,
    Simulate,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Valves, Tab::Sensors, Tab::Queue, Tab::Config, Tab::Simulate];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Valves => "Valves",
            Tab::Sensors => "Sensors",
            Tab::Queue => "Queue",
            Tab::Config => "Config",
            Tab::Simulate => "Simulate",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What keystrokes currently feed.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    QueueDuration { valve: String, input: String },
    EditSchedule { valve: String, slot: ScheduleSlot },
    ConfirmDelete { valve: String, index: usize },
    Simulate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub running: bool,
    pub tab: Tab,
    pub mode: InputMode,
    pub config: DashboardConfig,
    pub api: Arc<dyn ControllerApi>,
    /// Event handler.
    pub events: EventHandler,
    pub polling: PollingSession,

    status_gate: SequenceGate,
    next_runs_gate: SequenceGate,

    /// Latest accepted snapshots. Kept even while the Valves tab is hidden.
    pub status: Option<StatusSnapshot>,
    pub queue: Option<QueueSnapshot>,
    pub next_runs: NextRunTable,
    pub controller_config: Option<ControllerConfig>,
    /// Last loaded detail per valve, shown when a panel reopens.
    pub details: HashMap<String, ValveDetail>,

    pub tree: VisualTree,
    pub session: ScheduleEditSession,
    pub selected_valve: usize,
    pub selected_schedule: Option<ScheduleSlot>,

    pub chart: TimeSeriesBuffer,
    /// Plot geometry recorded by the last draw; `None` while the chart is
    /// not on screen.
    pub chart_geometry: Option<ChartGeometry>,
    pub pointer: Option<Position>,
    pub hovered: Option<Tooltip>,

    pub toast: Option<Toast>,
    pub simulate: SimulateForm,
}

impl App {
    /// Constructs a new instance of [`App`]. Polling does not start until
    /// [`App::run`].
    pub fn new(config: DashboardConfig, api: Arc<dyn ControllerApi>, events: EventHandler) -> Self {
        let polling = PollingSession::new(
            api.clone(),
            events.sender(),
            PollingSettings::from(&config.polling),
        );
        let tree = VisualTree::new(config.ui.stale_entities);

        Self {
            running: true,
            tab: Tab::Valves,
            mode: InputMode::Normal,
            config,
            api,
            events,
            polling,
            status_gate: SequenceGate::default(),
            next_runs_gate: SequenceGate::default(),
            status: None,
            queue: None,
            next_runs: NextRunTable::new(),
            controller_config: None,
            details: HashMap::new(),
            tree,
            session: ScheduleEditSession::default(),
            selected_valve: 0,
            selected_schedule: None,
            chart: TimeSeriesBuffer::default(),
            chart_geometry: None,
            pointer: None,
            hovered: None,
            toast: None,
            simulate: SimulateForm::default(),
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.polling.start();
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
                needs_redraw = false;
            }

            match self.events.next().await? {
                Event::Tick => needs_redraw = self.tick(),
                Event::Crossterm(event) => match event {
                    CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        self.handle_key_events(key_event);
                        needs_redraw = true;
                    }
                    CrosstermEvent::Mouse(mouse_event) => {
                        needs_redraw = self.handle_mouse_event(mouse_event);
                    }
                    CrosstermEvent::Resize(_, _) => needs_redraw = true,
                    _ => {}
                },
                Event::App(app_event) => {
                    self.handle_app_event(app_event);
                    needs_redraw = true;
                }
            }
        }

        self.polling.stop();
        log_info!("Dashboard shut down");
        Ok(())
    }

    /// Expires the toast. Returns whether anything visible changed.
    pub fn tick(&mut self) -> bool {
        match &self.toast {
            Some(toast) if toast.expires_at <= Instant::now() => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        let ttl = self.config.ui.toast_duration().max(Duration::from_millis(500));
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            expires_at: Instant::now() + ttl,
        });
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab == tab {
            return;
        }
        self.tab = tab;
        self.mode = InputMode::Normal;
        self.hovered = None;
        self.chart_geometry = None;

        match tab {
            Tab::Valves => {
                self.reconcile_valves();
                self.refresh_now();
            }
            Tab::Sensors | Tab::Queue => {
                self.polling.request_status();
            }
            Tab::Config => {
                if self.controller_config.is_none() {
                    self.spawn_config_load();
                }
            }
            Tab::Simulate => {}
        }
    }

    pub fn refresh_now(&mut self) {
        self.polling.request_status();
        self.polling.request_next_runs();
    }

    /// Derive view models from the cached snapshots and patch the tree.
    pub fn reconcile_valves(&mut self) -> ReconcileReport {
        let (Some(status), Some(queue)) = (&self.status, &self.queue) else {
            return ReconcileReport::default();
        };
        let views = derive_valve_views(&status.valves, queue, &self.next_runs, &Local::now());
        let report = self.tree.reconcile(&views);

        // Freshly built cards start without a panel; restore the ones the
        // session still has open.
        let rebuilt: Vec<String> = report
            .built()
            .filter(|valve| self.session.is_panel_open(valve))
            .map(str::to_string)
            .collect();
        for valve in rebuilt {
            self.restore_panel(&valve);
        }

        self.clamp_selection();
        report
    }

    /// Slow-cycle update of the next-run rows only.
    pub fn refresh_next_run_rows(&mut self) -> ReconcileReport {
        let (Some(status), Some(queue)) = (&self.status, &self.queue) else {
            return ReconcileReport::default();
        };
        let views = derive_valve_views(&status.valves, queue, &self.next_runs, &Local::now());
        self.tree.refresh_next_runs(&views)
    }

    pub fn selected_valve_name(&self) -> Option<String> {
        self.tree.cards().get(self.selected_valve).map(|c| c.name.clone())
    }

    pub fn toggle_panel(&mut self, valve: &str) {
        self.apply_session(SessionIntent::TogglePanel { valve: valve.to_string() });
        if self.session.is_panel_open(valve) {
            self.restore_panel(valve);
            self.spawn_detail_load(valve);
        } else {
            self.tree.detach_panel(valve);
            self.selected_schedule = None;
        }
    }

    /// Attach the panel and fill it from the last loaded detail, if any.
    fn restore_panel(&mut self, valve: &str) {
        self.tree.attach_panel(valve);
        if let Some(detail) = self.details.get(valve).cloned() {
            self.tree.set_panel_content(valve, PanelContent::Loaded(detail));
        }
    }

    pub(crate) fn apply_session(&mut self, intent: SessionIntent) {
        let state = std::mem::take(&mut self.session);
        let (state, events) = ScheduleEditStateMachine::transition(state, intent);
        self.session = state;
        for event in events {
            crate::log_debug!("Session: {:?}", event);
        }
    }

    /// Schedule rows of the selected valve's open panel, plus the row for a
    /// new schedule.
    pub fn schedule_slots(&self, valve: &str) -> Vec<ScheduleSlot> {
        let count = match self.tree.panel(valve).map(|p| &p.content) {
            Some(PanelContent::Loaded(detail)) => detail.schedules.len(),
            _ => return Vec::new(),
        };
        (0..count)
            .map(ScheduleSlot::Existing)
            .chain(std::iter::once(ScheduleSlot::New))
            .collect()
    }

    fn clamp_selection(&mut self) {
        let count = self.tree.cards().len();
        if count == 0 {
            self.selected_valve = 0;
        } else if self.selected_valve >= count {
            self.selected_valve = count - 1;
        }
    }

    /// Re-run the hit test against the geometry of the last draw.
    pub fn update_hover(&mut self) -> bool {
        let hovered = match (self.chart_geometry, self.pointer) {
            (Some(geometry), Some(pointer)) => geometry.hit_test(pointer, &self.chart),
            _ => None,
        };
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        api::{Schedule, SimulationRequest, ValveAction},
        error::Result as ApiResult,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and answers from canned data.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingApi {
        pub calls: Mutex<Vec<String>>,
    }

    impl RecordingApi {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        fn record(&self, call: String) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }
    }

    pub(crate) fn status_json(open: bool) -> StatusSnapshot {
        serde_json::from_value(serde_json::json!({
            "system": { "status": "OK", "season": "Summer" },
            "valves": [
                {
                    "name": "front", "enabled": true, "is_open": open, "suspended": false,
                    "seconds_remain": if open { 300 } else { 0 },
                    "seconds_duration": if open { 600 } else { 0 },
                    "seconds_daily": 120, "liters_daily": 4.0,
                    "seconds_last": 0, "liters_last": 0.0
                },
                { "name": "back", "enabled": false, "is_open": false }
            ],
            "sensors": [],
            "waterflow": {
                "enabled": true, "is_active": open, "flow_rate": 3.5,
                "history": [
                    { "timestamp": "2026-10-19T06:00:00+00:00", "value": 2.0 },
                    { "timestamp": "2026-10-19T06:01:00+00:00", "value": 12.0 }
                ]
            }
        }))
        .unwrap()
    }

    pub(crate) fn detail(durations: &[u32]) -> ValveDetail {
        ValveDetail {
            name: "front".to_string(),
            valve_type: "drip".to_string(),
            sensor_name: None,
            schedules: durations
                .iter()
                .map(|d| Schedule {
                    time_based_on: crate::api::TimeBase::Fixed,
                    fixed_start_time: Some("06:00".to_string()),
                    offset_minutes: None,
                    duration: *d,
                    seasons: vec!["Summer".to_string()],
                    days: vec!["Mon".to_string()],
                    enable_uv_adjustments: false,
                })
                .collect(),
        }
    }

    #[async_trait]
    impl ControllerApi for RecordingApi {
        async fn status(&self) -> ApiResult<StatusSnapshot> {
            self.record("status".to_string());
            Ok(status_json(false))
        }
        async fn queue(&self) -> ApiResult<QueueSnapshot> {
            self.record("queue".to_string());
            Ok(QueueSnapshot::default())
        }
        async fn next_runs(&self) -> ApiResult<NextRunTable> {
            self.record("next_runs".to_string());
            Ok(NextRunTable::new())
        }
        async fn config(&self) -> ApiResult<ControllerConfig> {
            self.record("config".to_string());
            Err("config unavailable".into())
        }
        async fn valve_action(&self, valve: &str, action: ValveAction) -> ApiResult<()> {
            self.record(format!("{} {}", action.path_segment(), valve));
            Ok(())
        }
        async fn valve_detail(&self, valve: &str) -> ApiResult<ValveDetail> {
            self.record(format!("detail {}", valve));
            Ok(detail(&[10]))
        }
        async fn create_schedule(&self, valve: &str, _: &Schedule) -> ApiResult<()> {
            self.record(format!("create {}", valve));
            Ok(())
        }
        async fn update_schedule(&self, valve: &str, index: usize, _: &Schedule) -> ApiResult<()> {
            self.record(format!("update {} {}", valve, index));
            Ok(())
        }
        async fn delete_schedule(&self, valve: &str, index: usize) -> ApiResult<()> {
            self.record(format!("delete {} {}", valve, index));
            Ok(())
        }
        async fn simulate(&self, _: &SimulationRequest) -> ApiResult<String> {
            self.record("simulate".to_string());
            Ok("report".to_string())
        }
    }

    pub(crate) fn test_app() -> (App, Arc<RecordingApi>) {
        let api = Arc::new(RecordingApi::default());
        let app = App::new(DashboardConfig::default(), api.clone(), EventHandler::detached());
        (app, api)
    }

    pub(crate) fn seed(app: &mut App, open: bool) {
        app.status = Some(status_json(open));
        app.queue = Some(QueueSnapshot::default());
        app.reconcile_valves();
    }

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Valves.next(), Tab::Sensors);
        assert_eq!(Tab::Simulate.next(), Tab::Valves);
        assert_eq!(Tab::Valves.prev(), Tab::Simulate);
    }

    #[tokio::test]
    async fn toast_expires_on_tick() {
        let (mut app, _) = test_app();
        app.show_toast("Saved", ToastKind::Success);
        assert!(!app.tick());
        app.toast.as_mut().unwrap().expires_at = Instant::now() - Duration::from_millis(1);
        assert!(app.tick());
        assert!(app.toast.is_none());
    }

    #[tokio::test]
    async fn panel_survives_reconcile_after_rebuild() {
        let (mut app, _) = test_app();
        seed(&mut app, false);
        app.toggle_panel("front");
        let panel_id = app.tree.panel("front").unwrap().id;

        app.status = Some(status_json(true));
        app.reconcile_valves();
        assert_eq!(app.tree.panel("front").unwrap().id, panel_id);
        assert!(app.session.is_panel_open("front"));

        app.toggle_panel("front");
        assert!(app.tree.panel("front").is_none());
    }

    #[tokio::test]
    async fn hover_follows_last_drawn_geometry() {
        let (mut app, _) = test_app();
        app.chart.replace_from(&status_json(true).waterflow.unwrap().history);
        app.chart_geometry = Some(ChartGeometry::new(ratatui::layout::Rect::new(0, 0, 120, 8)));

        app.pointer = Some(Position::new(1, 3));
        assert!(app.update_hover());
        assert_eq!(app.hovered.as_ref().unwrap().value_text, "12.0 L/min");

        app.pointer = Some(Position::new(50, 3));
        assert!(app.update_hover());
        assert!(app.hovered.is_none());
        assert!(!app.update_hover());
    }
}
