use crate::{log_debug, view_model::ValveViewModel};

use super::{PatchKind, ReconcileReport, StaleEntityPolicy, VisualTree};

impl VisualTree {
    /// Bring the tree in line with the latest view models. Unknown valves
    /// get a full build, known ones are patched field by field.
    pub fn reconcile(&mut self, views: &[ValveViewModel]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for view in views {
            match self.cards.iter().position(|c| c.name == view.name) {
                Some(index) => self.patch_card(index, view, &mut report),
                None => {
                    let card = self.build_card(view);
                    self.cards.push(card);
                    report.push(&view.name, PatchKind::Built);
                }
            }
        }

        if self.policy == StaleEntityPolicy::Remove {
            let mut removed = Vec::new();
            self.cards.retain(|card| {
                let present = views.iter().any(|v| v.name == card.name);
                if !present {
                    removed.push(card.name.clone());
                }
                present
            });
            for name in removed {
                report.push(&name, PatchKind::Removed);
            }
        }

        if !report.is_empty() {
            log_debug!("Reconcile applied {} patches", report.patches.len());
        }
        report
    }
}
