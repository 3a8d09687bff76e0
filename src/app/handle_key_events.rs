use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    api::ValveAction,
    event::AppEvent,
    reconcile::PanelContent,
    session::{ScheduleSlot, SessionIntent},
    view_model::ToggleControl,
};

use super::{App, InputMode, Tab, ToastKind};

impl App {
    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            self.events.send(AppEvent::Quit);
            return;
        }

        match self.mode.clone() {
            InputMode::Normal => self.handle_normal_key(key_event),
            InputMode::QueueDuration { valve, input } => self.handle_queue_prompt_key(key_event, valve, input),
            InputMode::EditSchedule { valve, slot } => self.handle_edit_key(key_event, valve, slot),
            InputMode::ConfirmDelete { valve, index } => self.handle_confirm_delete_key(key_event, valve, index),
            InputMode::Simulate => self.handle_simulate_key(key_event),
        }
    }

    fn handle_normal_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.events.send(AppEvent::Quit);
                return;
            }
            KeyCode::Tab | KeyCode::Right => {
                self.switch_tab(self.tab.next());
                return;
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.switch_tab(self.tab.prev());
                return;
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index]);
                return;
            }
            KeyCode::Char('r') => {
                self.refresh_now();
                if self.tab == Tab::Config {
                    self.spawn_config_load();
                }
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Valves => self.handle_valves_key(key_event),
            Tab::Simulate => match key_event.code {
                KeyCode::Enter | KeyCode::Char('i') => self.mode = InputMode::Simulate,
                KeyCode::Up | KeyCode::Char('k') => self.simulate.scroll = self.simulate.scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => self.simulate.scroll = self.simulate.scroll.saturating_add(1),
                _ => {}
            },
            Tab::Sensors | Tab::Queue | Tab::Config => {}
        }
    }

    fn handle_valves_key(&mut self, key_event: KeyEvent) {
        let Some(valve) = self.selected_valve_name() else {
            return;
        };

        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_valve = self.selected_valve.saturating_sub(1);
                self.selected_schedule = None;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_valve + 1 < self.tree.cards().len() {
                    self.selected_valve += 1;
                }
                self.selected_schedule = None;
            }
            KeyCode::Enter => self.toggle_panel(&valve),
            KeyCode::Char('s') => self.start_selected(&valve),
            KeyCode::Char('x') => self.stop_selected(&valve),
            KeyCode::Char('t') => {
                if let Some(card) = self.tree.card(&valve) {
                    let action = match card.actions.enable_toggle.control {
                        ToggleControl::Enable => ValveAction::Enable,
                        _ => ValveAction::Disable,
                    };
                    self.spawn_valve_action(&valve, action);
                }
            }
            KeyCode::Char('p') => {
                if let Some(card) = self.tree.card(&valve) {
                    let action = match card.actions.suspend_toggle.control {
                        ToggleControl::Resume => ValveAction::Resume,
                        _ => ValveAction::Suspend,
                    };
                    self.spawn_valve_action(&valve, action);
                }
            }
            KeyCode::Char('u') => {
                self.mode = InputMode::QueueDuration {
                    valve,
                    input: self.config.ui.default_queue_minutes.to_string(),
                };
            }
            KeyCode::Char(']') => self.step_schedule(&valve, true),
            KeyCode::Char('[') => self.step_schedule(&valve, false),
            KeyCode::Char('e') => {
                if let Some(slot @ ScheduleSlot::Existing(_)) = self.selected_schedule {
                    self.begin_edit(&valve, slot);
                }
            }
            KeyCode::Char('n') => {
                if self.session.is_panel_open(&valve) {
                    self.begin_edit(&valve, ScheduleSlot::New);
                }
            }
            KeyCode::Char('D') => {
                if let Some(ScheduleSlot::Existing(index)) = self.selected_schedule {
                    self.mode = InputMode::ConfirmDelete { valve, index };
                }
            }
            _ => {}
        }
    }

    /// Start is refused while the valve is open, Stop while it is not. Both
    /// read the card's current status.
    fn start_selected(&mut self, valve: &str) {
        match self.tree.card(valve).map(|card| card.start_enabled()) {
            Some(true) => self.spawn_valve_action(valve, ValveAction::StartManual),
            Some(false) => self.show_toast(format!("Valve {} is already open", valve), ToastKind::Error),
            None => {}
        }
    }

    fn stop_selected(&mut self, valve: &str) {
        match self.tree.card(valve).map(|card| card.stop_enabled()) {
            Some(true) => self.spawn_valve_action(valve, ValveAction::Stop),
            Some(false) => self.show_toast(format!("Valve {} is not open", valve), ToastKind::Error),
            None => {}
        }
    }

    fn step_schedule(&mut self, valve: &str, forward: bool) {
        let slots = self.schedule_slots(valve);
        if slots.is_empty() {
            self.selected_schedule = None;
            return;
        }
        let current = self
            .selected_schedule
            .and_then(|slot| slots.iter().position(|s| *s == slot));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => slots.len() - 1,
            (Some(i), true) => (i + 1) % slots.len(),
            (Some(i), false) => (i + slots.len() - 1) % slots.len(),
        };
        self.selected_schedule = Some(slots[next]);
    }

    fn begin_edit(&mut self, valve: &str, slot: ScheduleSlot) {
        if !matches!(self.tree.panel(valve).map(|p| &p.content), Some(PanelContent::Loaded(_))) {
            return;
        }
        self.apply_session(SessionIntent::BeginEdit { valve: valve.to_string(), slot });
        if self.session.is_editing(valve, slot) {
            self.selected_schedule = Some(slot);
            self.mode = InputMode::EditSchedule { valve: valve.to_string(), slot };
        }
    }

    fn handle_edit_key(&mut self, key_event: KeyEvent, valve: String, slot: ScheduleSlot) {
        match key_event.code {
            KeyCode::Esc => {
                self.apply_session(SessionIntent::CancelEdit { valve, slot });
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let Some(draft) = self.session.draft(&valve, slot) else {
                    self.mode = InputMode::Normal;
                    return;
                };
                match draft.to_schedule() {
                    Ok(schedule) => {
                        let index = match slot {
                            ScheduleSlot::Existing(index) => Some(index),
                            ScheduleSlot::New => None,
                        };
                        self.spawn_schedule_save(&valve, index, schedule);
                    }
                    Err(e) => self.show_toast(e.user_message(), ToastKind::Error),
                }
            }
            code => {
                let Some(draft) = self.session.draft_mut(&valve, slot) else {
                    self.mode = InputMode::Normal;
                    return;
                };
                match code {
                    KeyCode::Tab | KeyCode::Down => draft.focus_next(),
                    KeyCode::BackTab | KeyCode::Up => draft.focus_prev(),
                    KeyCode::Left => draft.move_cursor(false),
                    KeyCode::Right => draft.move_cursor(true),
                    KeyCode::Char(' ') => draft.toggle(),
                    KeyCode::Char(c) => draft.input_char(c),
                    KeyCode::Backspace => draft.backspace(),
                    _ => {}
                }
            }
        }
    }

    fn handle_confirm_delete_key(&mut self, key_event: KeyEvent, valve: String, index: usize) {
        match key_event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.spawn_schedule_delete(&valve, index);
                self.mode = InputMode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = InputMode::Normal,
            _ => {}
        }
    }

    fn handle_queue_prompt_key(&mut self, key_event: KeyEvent, valve: String, mut input: String) {
        match key_event.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                return;
            }
            KeyCode::Enter => {
                match input.trim().parse::<f64>() {
                    Ok(minutes) if minutes > 0.0 => {
                        self.spawn_valve_action(&valve, ValveAction::Queue { duration_minutes: minutes });
                        self.mode = InputMode::Normal;
                    }
                    _ => self.show_toast("Enter a duration in minutes", ToastKind::Error),
                }
                return;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) if (c.is_ascii_digit() || c == '.') && input.len() < 6 => input.push(c),
            _ => return,
        }
        self.mode = InputMode::QueueDuration { valve, input };
    }

    fn handle_simulate_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::Down => self.simulate.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.simulate.focus_prev(),
            KeyCode::Backspace => self.simulate.backspace(),
            KeyCode::Char(c) => self.simulate.input_char(c),
            KeyCode::Enter => {
                if self.simulate.running {
                    return;
                }
                match self.simulate.to_request() {
                    Ok(request) => {
                        self.simulate.running = true;
                        self.spawn_simulation(request);
                    }
                    Err(e) => self.show_toast(e.user_message(), ToastKind::Error),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{detail, seed, test_app};
    use ratatui::crossterm::event::KeyEvent;
    use std::time::Duration;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_events(KeyEvent::new(code, KeyModifiers::NONE));
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn start_is_refused_while_open() {
        let (mut app, api) = test_app();
        seed(&mut app, true);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.toast.as_ref().unwrap().message, "Valve front is already open");

        press(&mut app, KeyCode::Char('x'));
        settle().await;
        assert!(api.calls().contains(&"stop front".to_string()));
        assert!(!api.calls().contains(&"start-manual front".to_string()));
    }

    #[tokio::test]
    async fn toggle_keys_follow_card_controls() {
        let (mut app, api) = test_app();
        seed(&mut app, false);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_valve_name().as_deref(), Some("back"));
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('p'));
        settle().await;
        let calls = api.calls();
        assert!(calls.contains(&"enable back".to_string()));
        assert!(calls.contains(&"suspend front".to_string()));
    }

    #[tokio::test]
    async fn queue_prompt_defaults_and_submits() {
        let (mut app, api) = test_app();
        seed(&mut app, false);
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(
            app.mode,
            InputMode::QueueDuration { valve: "front".to_string(), input: "15".to_string() }
        );
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, InputMode::Normal);
        settle().await;
        assert!(api.calls().contains(&"queue front".to_string()));
    }

    #[tokio::test]
    async fn edit_cancel_and_save_flow() {
        let (mut app, api) = test_app();
        seed(&mut app, false);
        press(&mut app, KeyCode::Enter);
        assert!(app.session.is_panel_open("front"));
        app.handle_app_event(AppEvent::DetailLoaded { valve: "front".to_string(), result: Ok(detail(&[10])) });

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.selected_schedule, Some(ScheduleSlot::Existing(0)));
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.mode, InputMode::EditSchedule { .. }));

        // Cancel discards.
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, InputMode::Normal);
        assert!(!app.session.is_editing("front", ScheduleSlot::Existing(0)));

        // Edit duration and save.
        press(&mut app, KeyCode::Char('e'));
        for _ in 0..2 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.session.draft("front", ScheduleSlot::Existing(0)).unwrap().duration, "15");
        press(&mut app, KeyCode::Enter);
        settle().await;
        assert!(api.calls().contains(&"update front 0".to_string()));
    }

    #[tokio::test]
    async fn invalid_draft_is_not_sent() {
        let (mut app, api) = test_app();
        seed(&mut app, false);
        press(&mut app, KeyCode::Enter);
        app.handle_app_event(AppEvent::DetailLoaded { valve: "front".to_string(), result: Ok(detail(&[])) });
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, InputMode::EditSchedule { valve: "front".to_string(), slot: ScheduleSlot::New });

        for _ in 0..2 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.toast.as_ref().unwrap().message, "Invalid schedule: Duration must be a whole number of minutes");
        settle().await;
        assert!(!api.calls().iter().any(|c| c.starts_with("create")));
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let (mut app, api) = test_app();
        seed(&mut app, false);
        press(&mut app, KeyCode::Enter);
        app.handle_app_event(AppEvent::DetailLoaded { valve: "front".to_string(), result: Ok(detail(&[10, 20])) });
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.selected_schedule, Some(ScheduleSlot::New));
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('D'));
        assert_eq!(app.mode, InputMode::ConfirmDelete { valve: "front".to_string(), index: 1 });
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.mode, InputMode::Normal);

        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('y'));
        settle().await;
        assert_eq!(api.calls().iter().filter(|c| c.starts_with("delete")).count(), 1);
    }

    #[tokio::test]
    async fn number_keys_switch_tabs() {
        let (mut app, _) = test_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab, Tab::Queue);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab, Tab::Sensors);
    }
}
