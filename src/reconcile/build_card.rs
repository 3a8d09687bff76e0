use crate::view_model::ValveViewModel;

use super::{
    ActionBarNode, ControlNode, NextRunNode, ProgressNode, StatusBadgeNode, TextNode, ValveCard,
    VisualTree,
};

impl VisualTree {
    /// Full structural build of a card, every node with a fresh id.
    pub(super) fn build_card(&mut self, view: &ValveViewModel) -> ValveCard {
        let id = self.allocate_id();

        let status = StatusBadgeNode {
            id: self.allocate_id(),
            text: view.status_label.clone(),
            class: view.status_class,
        };

        let queue_badge = view.queue_badge_text.as_ref().map(|text| TextNode {
            id: self.allocate_id(),
            text: text.clone(),
        });

        let progress = self.build_progress(view);

        let daily_total = TextNode {
            id: self.allocate_id(),
            text: view.daily_total_text.clone(),
        };

        let next_run = NextRunNode {
            id: self.allocate_id(),
            text: view.next_run_row_text(),
            class: view.next_run_class,
        };

        let actions = ActionBarNode {
            id: self.allocate_id(),
            enable_toggle: ControlNode {
                id: self.allocate_id(),
                control: view.enable_control,
            },
            suspend_toggle: ControlNode {
                id: self.allocate_id(),
                control: view.suspend_control,
            },
        };

        ValveCard {
            id,
            name: view.name.clone(),
            status,
            queue_badge,
            progress,
            daily_total,
            next_run,
            actions,
            detail_panel: None,
        }
    }

    pub(super) fn build_progress(&mut self, view: &ValveViewModel) -> Option<ProgressNode> {
        let ratio = view.progress_ratio?;
        Some(ProgressNode {
            id: self.allocate_id(),
            ratio,
            remaining_text: view.remaining_text.clone().unwrap_or_default(),
        })
    }
}
