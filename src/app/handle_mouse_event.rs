use ratatui::{
    crossterm::event::{MouseEvent, MouseEventKind},
    layout::Position,
};

use super::App;

impl App {
    /// Pointer moves only update the chart tooltip; no I/O happens here.
    /// Returns whether a redraw is needed.
    pub fn handle_mouse_event(&mut self, mouse_event: MouseEvent) -> bool {
        match mouse_event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer = Some(Position::new(mouse_event.column, mouse_event.row));
                self.update_hover()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::tests::{status_json, test_app},
        chart::ChartGeometry,
    };
    use ratatui::{crossterm::event::KeyModifiers, layout::Rect};

    fn moved(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test]
    async fn moving_across_chart_shows_and_hides_tooltip() {
        let (mut app, _) = test_app();
        app.chart.replace_from(&status_json(true).waterflow.unwrap().history);
        app.chart_geometry = Some(ChartGeometry::new(Rect::new(10, 20, 120, 6)));

        assert!(app.handle_mouse_event(moved(10, 22)));
        assert_eq!(app.hovered.as_ref().unwrap().value_text, "2.0 L/min");

        assert!(!app.handle_mouse_event(moved(10, 23)));

        assert!(app.handle_mouse_event(moved(5, 5)));
        assert!(app.hovered.is_none());
    }
}
