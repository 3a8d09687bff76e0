// src/session/mod.rs
//! Which detail panels are open and which schedules are being edited.
//! Only user intents and committed saves change this state; polling never
//! does.

mod draft;

pub use draft::{DraftField, ScheduleDraft, SEASONS, WEEKDAYS};

use std::collections::{BTreeSet, HashMap};

use crate::api::Schedule;

/// A schedule row, or the extra row for a schedule not yet created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScheduleSlot {
    Existing(usize),
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub valve: String,
    pub slot: ScheduleSlot,
}

impl EditKey {
    pub fn new(valve: &str, slot: ScheduleSlot) -> Self {
        Self { valve: valve.to_string(), slot }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleEditSession {
    open_panels: BTreeSet<String>,
    /// Last schedule list loaded per valve; edits start from these.
    schedules: HashMap<String, Vec<Schedule>>,
    editing: HashMap<EditKey, ScheduleDraft>,
}

impl ScheduleEditSession {
    pub fn is_panel_open(&self, valve: &str) -> bool {
        self.open_panels.contains(valve)
    }

    pub fn open_panels(&self) -> impl Iterator<Item = &str> {
        self.open_panels.iter().map(String::as_str)
    }

    pub fn schedules(&self, valve: &str) -> Option<&[Schedule]> {
        self.schedules.get(valve).map(Vec::as_slice)
    }

    pub fn draft(&self, valve: &str, slot: ScheduleSlot) -> Option<&ScheduleDraft> {
        self.editing.get(&EditKey::new(valve, slot))
    }

    pub fn draft_mut(&mut self, valve: &str, slot: ScheduleSlot) -> Option<&mut ScheduleDraft> {
        self.editing.get_mut(&EditKey::new(valve, slot))
    }

    pub fn is_editing(&self, valve: &str, slot: ScheduleSlot) -> bool {
        self.editing.contains_key(&EditKey::new(valve, slot))
    }

    pub fn edits_for(&self, valve: &str) -> usize {
        self.editing.keys().filter(|k| k.valve == valve).count()
    }
}

// ----------------------------------------------------------------------------
// INTENT - Messages that express what user wants to do
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SessionIntent {
    TogglePanel { valve: String },
    SchedulesLoaded { valve: String, schedules: Vec<Schedule> },
    BeginEdit { valve: String, slot: ScheduleSlot },
    CancelEdit { valve: String, slot: ScheduleSlot },
    /// A save or delete for this valve succeeded on the server.
    ChangeCommitted { valve: String },
}

// ----------------------------------------------------------------------------
// EVENTS - Things that happened (past tense)
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PanelOpened { valve: String },
    PanelClosed { valve: String },
    EditStarted { valve: String, slot: ScheduleSlot },
    EditDiscarded { valve: String, slot: ScheduleSlot },
    EditsCollapsed { valve: String, count: usize },
}

// ----------------------------------------------------------------------------
// STATE MACHINE - Pure function: (State, Intent) -> (State, Vec<Event>)
// ----------------------------------------------------------------------------

pub struct ScheduleEditStateMachine;

impl ScheduleEditStateMachine {
    pub fn transition(
        state: ScheduleEditSession,
        intent: SessionIntent,
    ) -> (ScheduleEditSession, Vec<SessionEvent>) {
        use SessionIntent::*;

        match intent {
            TogglePanel { valve } => Self::handle_toggle_panel(state, valve),
            SchedulesLoaded { valve, schedules } => Self::handle_loaded(state, valve, schedules),
            BeginEdit { valve, slot } => Self::handle_begin_edit(state, valve, slot),
            CancelEdit { valve, slot } => Self::handle_cancel(state, valve, slot),
            ChangeCommitted { valve } => Self::handle_committed(state, valve),
        }
    }

    fn handle_toggle_panel(
        mut state: ScheduleEditSession,
        valve: String,
    ) -> (ScheduleEditSession, Vec<SessionEvent>) {
        if state.open_panels.remove(&valve) {
            (state, vec![SessionEvent::PanelClosed { valve }])
        } else {
            state.open_panels.insert(valve.clone());
            (state, vec![SessionEvent::PanelOpened { valve }])
        }
    }

    fn handle_loaded(
        mut state: ScheduleEditSession,
        valve: String,
        schedules: Vec<Schedule>,
    ) -> (ScheduleEditSession, Vec<SessionEvent>) {
        state.schedules.insert(valve, schedules);
        (state, vec![])
    }

    /// Copies the loaded schedule into a draft, no fetch. Re-entering an
    /// active edit keeps the existing draft.
    fn handle_begin_edit(
        mut state: ScheduleEditSession,
        valve: String,
        slot: ScheduleSlot,
    ) -> (ScheduleEditSession, Vec<SessionEvent>) {
        let key = EditKey::new(&valve, slot);
        if state.editing.contains_key(&key) {
            return (state, vec![]);
        }

        let draft = match slot {
            ScheduleSlot::New => ScheduleDraft::blank(),
            ScheduleSlot::Existing(index) => {
                match state.schedules.get(&valve).and_then(|list| list.get(index)) {
                    Some(schedule) => ScheduleDraft::from_schedule(schedule),
                    None => return (state, vec![]),
                }
            }
        };

        state.editing.insert(key, draft);
        (state, vec![SessionEvent::EditStarted { valve, slot }])
    }

    fn handle_cancel(
        mut state: ScheduleEditSession,
        valve: String,
        slot: ScheduleSlot,
    ) -> (ScheduleEditSession, Vec<SessionEvent>) {
        match state.editing.remove(&EditKey::new(&valve, slot)) {
            Some(_) => (state, vec![SessionEvent::EditDiscarded { valve, slot }]),
            None => (state, vec![]),
        }
    }

    /// Indices may have shifted on the server, so every edit for the valve
    /// goes back to display mode.
    fn handle_committed(
        mut state: ScheduleEditSession,
        valve: String,
    ) -> (ScheduleEditSession, Vec<SessionEvent>) {
        let before = state.editing.len();
        state.editing.retain(|key, _| key.valve != valve);
        let count = before - state.editing.len();
        (state, vec![SessionEvent::EditsCollapsed { valve, count }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TimeBase;

    fn schedule(duration: u32) -> Schedule {
        Schedule {
            time_based_on: TimeBase::Fixed,
            fixed_start_time: Some("06:30".to_string()),
            offset_minutes: None,
            duration,
            seasons: vec!["Summer".to_string()],
            days: vec!["Mon".to_string()],
            enable_uv_adjustments: false,
        }
    }

    fn apply(state: ScheduleEditSession, intent: SessionIntent) -> (ScheduleEditSession, Vec<SessionEvent>) {
        ScheduleEditStateMachine::transition(state, intent)
    }

    fn loaded() -> ScheduleEditSession {
        let (state, _) = apply(
            ScheduleEditSession::default(),
            SessionIntent::SchedulesLoaded {
                valve: "front".to_string(),
                schedules: vec![schedule(10), schedule(20)],
            },
        );
        state
    }

    #[test]
    fn panel_toggles_open_and_closed() {
        let (state, events) = apply(
            ScheduleEditSession::default(),
            SessionIntent::TogglePanel { valve: "front".to_string() },
        );
        assert!(state.is_panel_open("front"));
        assert_eq!(events, vec![SessionEvent::PanelOpened { valve: "front".to_string() }]);

        let (state, events) = apply(state, SessionIntent::TogglePanel { valve: "front".to_string() });
        assert!(!state.is_panel_open("front"));
        assert_eq!(events, vec![SessionEvent::PanelClosed { valve: "front".to_string() }]);
    }

    #[test]
    fn begin_edit_copies_loaded_schedule() {
        let (state, events) = apply(
            loaded(),
            SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(1) },
        );
        assert_eq!(events.len(), 1);
        let draft = state.draft("front", ScheduleSlot::Existing(1)).unwrap();
        assert_eq!(draft.duration, "20");
        assert!(!state.is_editing("front", ScheduleSlot::Existing(0)));
    }

    #[test]
    fn begin_edit_on_unknown_index_is_ignored() {
        let (state, events) = apply(
            loaded(),
            SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(7) },
        );
        assert!(events.is_empty());
        assert_eq!(state.edits_for("front"), 0);
    }

    #[test]
    fn cancel_discards_draft_changes() {
        let (mut state, _) = apply(
            loaded(),
            SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) },
        );
        state.draft_mut("front", ScheduleSlot::Existing(0)).unwrap().duration = "99".to_string();

        let (state, events) = apply(
            state,
            SessionIntent::CancelEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) },
        );
        assert_eq!(events.len(), 1);
        assert!(!state.is_editing("front", ScheduleSlot::Existing(0)));
        assert_eq!(state.schedules("front").unwrap()[0].duration, 10);

        let (state, _) = apply(
            state,
            SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) },
        );
        assert_eq!(state.draft("front", ScheduleSlot::Existing(0)).unwrap().duration, "10");
    }

    #[test]
    fn commit_collapses_only_that_valves_edits() {
        let mut state = loaded();
        for intent in [
            SessionIntent::SchedulesLoaded { valve: "back".to_string(), schedules: vec![schedule(5)] },
            SessionIntent::TogglePanel { valve: "front".to_string() },
            SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::Existing(0) },
            SessionIntent::BeginEdit { valve: "front".to_string(), slot: ScheduleSlot::New },
            SessionIntent::BeginEdit { valve: "back".to_string(), slot: ScheduleSlot::Existing(0) },
        ] {
            state = apply(state, intent).0;
        }

        let (state, events) = apply(state, SessionIntent::ChangeCommitted { valve: "front".to_string() });
        assert_eq!(events, vec![SessionEvent::EditsCollapsed { valve: "front".to_string(), count: 2 }]);
        assert_eq!(state.edits_for("front"), 0);
        assert!(state.is_editing("back", ScheduleSlot::Existing(0)));
        assert!(state.is_panel_open("front"));
    }
}
