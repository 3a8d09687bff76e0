use super::{DetailPanelNode, NodeId, PanelContent, VisualTree};

impl VisualTree {
    /// Insert a loading detail panel under the valve's card. An already open
    /// panel is left alone. Returns the panel id.
    pub fn attach_panel(&mut self, valve: &str) -> Option<NodeId> {
        if let Some(existing) = self.card(valve).and_then(|c| c.detail_panel.as_ref()) {
            return Some(existing.id);
        }
        self.card(valve)?;

        let id = self.allocate_id();
        let content_id = self.allocate_id();
        let card = self.card_mut(valve)?;
        card.detail_panel = Some(DetailPanelNode {
            id,
            content_id,
            content: PanelContent::Loading,
        });
        Some(id)
    }

    pub fn detach_panel(&mut self, valve: &str) -> bool {
        self.card_mut(valve)
            .and_then(|card| card.detail_panel.take())
            .is_some()
    }

    /// Replace the panel body. The panel node keeps its id; the content
    /// node is rebuilt.
    pub fn set_panel_content(&mut self, valve: &str, content: PanelContent) -> bool {
        if self.card(valve).and_then(|c| c.detail_panel.as_ref()).is_none() {
            return false;
        }
        let content_id = self.allocate_id();
        match self.card_mut(valve).and_then(|c| c.detail_panel.as_mut()) {
            Some(panel) => {
                panel.content_id = content_id;
                panel.content = content;
                true
            }
            None => false,
        }
    }

    pub fn panel(&self, valve: &str) -> Option<&DetailPanelNode> {
        self.card(valve).and_then(|c| c.detail_panel.as_ref())
    }
}
