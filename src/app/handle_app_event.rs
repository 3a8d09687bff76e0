use crate::{
    error::DashboardError,
    event::AppEvent,
    log_debug, log_error, log_warn,
    reconcile::PanelContent,
    session::SessionIntent,
};

use super::{App, InputMode, Tab, ToastKind};

impl App {
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.quit(),

            AppEvent::StatusFetched { seq, result } => {
                if !self.status_gate.accept(seq) {
                    log_debug!("Discarding stale status result #{}", seq);
                    return;
                }
                match result {
                    Ok((status, queue)) => {
                        if let Some(waterflow) = &status.waterflow {
                            self.chart.replace_from(&waterflow.history);
                        }
                        self.status = Some(status);
                        self.queue = Some(queue);
                        if self.tab == Tab::Valves {
                            self.reconcile_valves();
                        }
                        self.update_hover();
                    }
                    Err(e) => self.report_error("Status refresh failed", &e),
                }
            }

            AppEvent::NextRunsFetched { seq, result } => {
                if !self.next_runs_gate.accept(seq) {
                    log_debug!("Discarding stale next-runs result #{}", seq);
                    return;
                }
                match result {
                    Ok(table) => {
                        self.next_runs = table;
                        if self.tab == Tab::Valves {
                            self.refresh_next_run_rows();
                        }
                    }
                    Err(e) => self.report_error("Next-run refresh failed", &e),
                }
            }

            AppEvent::ActionFinished { valve, action, result } => match result {
                Ok(()) => {
                    self.show_toast(action.success_message(&valve), ToastKind::Success);
                    self.polling.request_status();
                    if action.affects_schedule() {
                        self.polling.request_next_runs();
                    }
                }
                Err(e) => self.report_error(&format!("{} on {}", action.path_segment(), valve), &e),
            },

            AppEvent::DetailLoaded { valve, result } => match result {
                Ok(detail) => {
                    self.apply_session(SessionIntent::SchedulesLoaded {
                        valve: valve.clone(),
                        schedules: detail.schedules.clone(),
                    });
                    self.details.insert(valve.clone(), detail.clone());
                    if self.session.is_panel_open(&valve) {
                        self.tree.set_panel_content(&valve, PanelContent::Loaded(detail));
                    }
                }
                Err(e) => {
                    if self.session.is_panel_open(&valve) {
                        self.tree.set_panel_content(&valve, PanelContent::Failed(e.user_message()));
                    }
                    self.report_error(&format!("Loading {}", valve), &e);
                }
            },

            AppEvent::ScheduleChanged { valve, change, result } => match result {
                Ok(()) => {
                    self.show_toast(change.success_message(), ToastKind::Success);
                    self.apply_session(SessionIntent::ChangeCommitted { valve: valve.clone() });
                    if matches!(&self.mode, InputMode::EditSchedule { valve: v, .. } | InputMode::ConfirmDelete { valve: v, .. } if *v == valve) {
                        self.mode = InputMode::Normal;
                    }
                    self.selected_schedule = None;
                    self.spawn_detail_load(&valve);
                    self.polling.request_next_runs();
                }
                // The draft stays in edit mode so nothing typed is lost.
                Err(e) => self.report_error(change.success_message(), &e),
            },

            AppEvent::ConfigLoaded(result) => match result {
                Ok(config) => self.controller_config = Some(config),
                Err(e) => self.report_error("Loading controller config", &e),
            },

            AppEvent::SimulationFinished(result) => {
                self.simulate.running = false;
                match result {
                    Ok(report) => {
                        self.simulate.report = Some(report);
                        self.simulate.scroll = 0;
                    }
                    Err(e) => self.report_error("Simulation", &e),
                }
            }
        }
    }

    /// One toast per failure, the previous view stays as it was.
    pub(crate) fn report_error(&mut self, context: &str, error: &DashboardError) {
        // An unreachable controller repeats every cycle until it comes back.
        if error.is_transport() {
            log_warn!("{}: {}", context, error);
        } else {
            log_error!("{}: {}", context, error);
        }
        self.show_toast(error.user_message(), ToastKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{NextRunEntry, NextRunTable, QueueSnapshot, ValveAction},
        app::tests::{detail, seed, status_json, test_app},
        event::ScheduleChange,
        reconcile::PatchKind,
        session::ScheduleSlot,
    };
    use chrono::{Duration, Local};

    #[tokio::test]
    async fn stale_status_results_are_discarded() {
        let (mut app, _) = test_app();
        app.handle_app_event(AppEvent::StatusFetched {
            seq: 2,
            result: Ok((status_json(true), QueueSnapshot::default())),
        });
        app.handle_app_event(AppEvent::StatusFetched {
            seq: 1,
            result: Ok((status_json(false), QueueSnapshot::default())),
        });

        let card = app.tree.card("front").unwrap();
        assert_eq!(card.status.text, "Open (5:00)");
        assert!(app.status.as_ref().unwrap().valves[0].is_open);
        assert_eq!(app.chart.len(), 2);
    }

    #[tokio::test]
    async fn hidden_valves_tab_caches_without_reconciling() {
        let (mut app, _) = test_app();
        app.tab = Tab::Sensors;
        app.handle_app_event(AppEvent::StatusFetched {
            seq: 1,
            result: Ok((status_json(false), QueueSnapshot::default())),
        });
        assert!(app.status.is_some());
        assert!(app.tree.cards().is_empty());

        app.switch_tab(Tab::Valves);
        assert_eq!(app.tree.cards().len(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_view() {
        let (mut app, _) = test_app();
        seed(&mut app, false);
        app.handle_app_event(AppEvent::StatusFetched {
            seq: 1,
            result: Err(DashboardError::Application { status: 500, message: "controller busy".to_string() }),
        });
        assert_eq!(app.toast.as_ref().unwrap().message, "controller busy");
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
        assert_eq!(app.tree.card("front").unwrap().status.text, "Closed");
    }

    #[tokio::test]
    async fn next_runs_only_touch_next_run_rows() {
        let (mut app, _) = test_app();
        seed(&mut app, false);
        let mut table = NextRunTable::new();
        table.insert(
            "front".to_string(),
            NextRunEntry { schedule_time: (Local::now() + Duration::days(10)).fixed_offset() },
        );
        let before = app.tree.card("front").unwrap().clone();

        app.handle_app_event(AppEvent::NextRunsFetched { seq: 1, result: Ok(table) });
        let after = app.tree.card("front").unwrap();
        assert_eq!(after.status, before.status);
        assert_ne!(after.next_run.text, before.next_run.text);
        assert_eq!(after.next_run.id, before.next_run.id);
        assert!(app.refresh_next_run_rows().kinds_for("front").iter().all(|k| *k == PatchKind::NextRun));
    }

    #[tokio::test]
    async fn action_success_toasts_and_repolls() {
        let (mut app, _) = test_app();
        app.handle_app_event(AppEvent::ActionFinished {
            valve: "front".to_string(),
            action: ValveAction::Suspend,
            result: Ok(()),
        });
        assert_eq!(app.toast.as_ref().unwrap().message, "Valve front suspended");
        // Both cycles were asked for fresh data.
        assert_eq!(app.polling.request_status(), 2);
        assert_eq!(app.polling.request_next_runs(), 2);
    }

    #[tokio::test]
    async fn detail_fills_open_panel_and_session() {
        let (mut app, _) = test_app();
        seed(&mut app, false);
        app.toggle_panel("front");
        app.handle_app_event(AppEvent::DetailLoaded { valve: "front".to_string(), result: Ok(detail(&[10, 20])) });

        assert_eq!(app.session.schedules("front").unwrap().len(), 2);
        assert_eq!(app.tree.panel("front").unwrap().content, PanelContent::Loaded(detail(&[10, 20])));
        assert_eq!(app.schedule_slots("front").len(), 3);
    }

    #[tokio::test]
    async fn committed_change_collapses_edits_and_reloads() {
        let (mut app, api) = test_app();
        seed(&mut app, false);
        app.toggle_panel("front");
        app.handle_app_event(AppEvent::DetailLoaded { valve: "front".to_string(), result: Ok(detail(&[10])) });
        app.apply_session(SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) });
        app.mode = InputMode::EditSchedule { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) };
        let panel_id = app.tree.panel("front").unwrap().id;

        app.handle_app_event(AppEvent::ScheduleChanged {
            valve: "front".to_string(),
            change: ScheduleChange::Updated(0),
            result: Ok(()),
        });
        assert_eq!(app.session.edits_for("front"), 0);
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.toast.as_ref().unwrap().message, "Schedule updated");

        // Wait for the reload the commit kicked off.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(api.calls().iter().filter(|c| c.as_str() == "detail front").count() >= 2);
        assert_eq!(app.tree.panel("front").unwrap().id, panel_id);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_draft() {
        let (mut app, _) = test_app();
        seed(&mut app, false);
        app.handle_app_event(AppEvent::DetailLoaded { valve: "front".to_string(), result: Ok(detail(&[10])) });
        app.apply_session(SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) });

        app.handle_app_event(AppEvent::ScheduleChanged {
            valve: "front".to_string(),
            change: ScheduleChange::Updated(0),
            result: Err(DashboardError::Application { status: 400, message: "Invalid time".to_string() }),
        });
        assert!(app.session.is_editing("front", ScheduleSlot::Existing(0)));
        assert_eq!(app.toast.as_ref().unwrap().message, "Invalid time");
    }
}
