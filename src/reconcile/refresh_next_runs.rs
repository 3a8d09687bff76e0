use crate::view_model::ValveViewModel;

use super::{PatchKind, ReconcileReport, VisualTree};

impl VisualTree {
    /// Slow-cycle refresh: only next-run rows are touched, everything else
    /// on the card keeps waiting for the fast cycle.
    pub fn refresh_next_runs(&mut self, views: &[ValveViewModel]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for view in views {
            let Some(card) = self.card_mut(&view.name) else {
                continue;
            };
            let text = view.next_run_row_text();
            if card.next_run.text != text || card.next_run.class != view.next_run_class {
                card.next_run.text = text;
                card.next_run.class = view.next_run_class;
                report.push(&view.name, PatchKind::NextRun);
            }
        }

        report
    }
}
