use crate::view_model::ValveViewModel;

use super::{NodeId, PatchKind, ReconcileReport, TextNode, ValveCard, VisualTree};

impl VisualTree {
    /// Patch each substructure of an existing card on its own. Nodes whose
    /// content is unchanged, and everything the view model does not describe
    /// (the detail panel), keep their identity.
    pub(super) fn patch_card(&mut self, index: usize, view: &ValveViewModel, report: &mut ReconcileReport) {
        let inserting_progress = self.cards[index].progress.is_none() && view.progress_ratio.is_some();
        let progress = if inserting_progress { self.build_progress(view) } else { None };

        let inserting_badge = self.cards[index].queue_badge.is_none() && view.queue_badge_text.is_some();
        let queue_badge_id = inserting_badge.then(|| self.allocate_id());

        let card = &mut self.cards[index];
        let name = card.name.clone();

        if card.status.text != view.status_label || card.status.class != view.status_class {
            card.status.text = view.status_label.clone();
            card.status.class = view.status_class;
            report.push(&name, PatchKind::Status);
        }

        patch_queue_badge(card, view, queue_badge_id, report);

        match (card.progress.as_mut(), view.progress_ratio) {
            (Some(node), Some(ratio)) => {
                let remaining = view.remaining_text.clone().unwrap_or_default();
                if node.ratio != ratio || node.remaining_text != remaining {
                    node.ratio = ratio;
                    node.remaining_text = remaining;
                    report.push(&name, PatchKind::ProgressUpdated);
                }
            }
            (Some(_), None) => {
                card.progress = None;
                report.push(&name, PatchKind::ProgressRemoved);
            }
            (None, Some(_)) => {
                card.progress = progress;
                report.push(&name, PatchKind::ProgressInserted);
            }
            (None, None) => {}
        }

        if card.daily_total.text != view.daily_total_text {
            card.daily_total.text = view.daily_total_text.clone();
            report.push(&name, PatchKind::DailyTotal);
        }

        let next_run_text = view.next_run_row_text();
        if card.next_run.text != next_run_text || card.next_run.class != view.next_run_class {
            card.next_run.text = next_run_text;
            card.next_run.class = view.next_run_class;
            report.push(&name, PatchKind::NextRun);
        }

        if card.actions.enable_toggle.control != view.enable_control {
            card.actions.enable_toggle.control = view.enable_control;
            report.push(&name, PatchKind::EnableControlSwapped);
        }
        if card.actions.suspend_toggle.control != view.suspend_control {
            card.actions.suspend_toggle.control = view.suspend_control;
            report.push(&name, PatchKind::SuspendControlSwapped);
        }
    }
}

fn patch_queue_badge(
    card: &mut ValveCard,
    view: &ValveViewModel,
    new_id: Option<NodeId>,
    report: &mut ReconcileReport,
) {
    match (card.queue_badge.as_mut(), &view.queue_badge_text) {
        (Some(badge), Some(text)) => {
            if badge.text != *text {
                badge.text = text.clone();
                report.push(&card.name, PatchKind::QueueBadgeUpdated);
            }
        }
        (Some(_), None) => {
            card.queue_badge = None;
            report.push(&card.name, PatchKind::QueueBadgeRemoved);
        }
        (None, Some(text)) => {
            card.queue_badge = new_id.map(|id| TextNode { id, text: text.clone() });
            report.push(&card.name, PatchKind::QueueBadgeInserted);
        }
        (None, None) => {}
    }
}
