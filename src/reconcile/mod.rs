mod build_card;
mod patch_card;
mod reconcile_valves;
mod refresh_next_runs;
mod panels;

use serde::{Deserialize, Serialize};

use crate::{
    api::ValveDetail,
    view_model::{NextRunClass, StatusClass, ToggleControl},
};

/// Identity of a node in the visual tree. A node keeps its id for as long as
/// it is patched rather than rebuilt.
pub type NodeId = u64;

/// What to do with a card whose valve is missing from the latest snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleEntityPolicy {
    /// Leave the last rendered card untouched.
    #[default]
    Keep,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadgeNode {
    pub id: NodeId,
    pub text: String,
    pub class: StatusClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub id: NodeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressNode {
    pub id: NodeId,
    pub ratio: f64,
    pub remaining_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextRunNode {
    pub id: NodeId,
    pub text: String,
    pub class: NextRunClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlNode {
    pub id: NodeId,
    pub control: ToggleControl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionBarNode {
    pub id: NodeId,
    pub enable_toggle: ControlNode,
    pub suspend_toggle: ControlNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    Loaded(ValveDetail),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanelNode {
    pub id: NodeId,
    pub content_id: NodeId,
    pub content: PanelContent,
}

/// Retained visual representation of one valve.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveCard {
    pub id: NodeId,
    pub name: String,
    pub status: StatusBadgeNode,
    pub queue_badge: Option<TextNode>,
    pub progress: Option<ProgressNode>,
    pub daily_total: TextNode,
    pub next_run: NextRunNode,
    pub actions: ActionBarNode,
    pub detail_panel: Option<DetailPanelNode>,
}

impl ValveCard {
    pub fn start_enabled(&self) -> bool {
        self.status.class != StatusClass::Open
    }

    pub fn stop_enabled(&self) -> bool {
        self.status.class == StatusClass::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Built,
    Removed,
    Status,
    QueueBadgeInserted,
    QueueBadgeUpdated,
    QueueBadgeRemoved,
    ProgressInserted,
    ProgressUpdated,
    ProgressRemoved,
    DailyTotal,
    NextRun,
    EnableControlSwapped,
    SuspendControlSwapped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub valve: String,
    pub kind: PatchKind,
}

/// Every structural change one reconcile pass made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub patches: Vec<Patch>,
}

impl ReconcileReport {
    pub(crate) fn push(&mut self, valve: &str, kind: PatchKind) {
        self.patches.push(Patch { valve: valve.to_string(), kind });
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn kinds_for(&self, valve: &str) -> Vec<PatchKind> {
        self.patches
            .iter()
            .filter(|p| p.valve == valve)
            .map(|p| p.kind)
            .collect()
    }

    pub fn built(&self) -> impl Iterator<Item = &str> {
        self.patches
            .iter()
            .filter(|p| p.kind == PatchKind::Built)
            .map(|p| p.valve.as_str())
    }
}

/// Live tree of valve cards patched in place from successive view models.
#[derive(Debug, Default)]
pub struct VisualTree {
    cards: Vec<ValveCard>,
    next_id: NodeId,
    policy: StaleEntityPolicy,
}

impl VisualTree {
    pub fn new(policy: StaleEntityPolicy) -> Self {
        Self {
            cards: Vec::new(),
            next_id: 0,
            policy,
        }
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        self.next_id += 1;
        self.next_id
    }

    pub fn cards(&self) -> &[ValveCard] {
        &self.cards
    }

    pub fn card(&self, valve: &str) -> Option<&ValveCard> {
        self.cards.iter().find(|c| c.name == valve)
    }

    pub(crate) fn card_mut(&mut self, valve: &str) -> Option<&mut ValveCard> {
        self.cards.iter_mut().find(|c| c.name == valve)
    }
}
