#[allow(unused_imports)] /// Needed for Stylize in this scope
use ratatui::style::{Style, Stylize};
use ratatui::style::Color;

use crate::{
    app::ToastKind,
    view_model::{NextRunClass, StatusClass, SystemLevel},
};

pub fn dim_unless_focused(is_focused: bool, style: Style) -> Style {
    if is_focused { style.bold() } else { style.dim().italic() }
}

pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Open => Color::Green,
        StatusClass::Closed => Color::Gray,
        StatusClass::Suspended => Color::Yellow,
        StatusClass::Disabled => Color::DarkGray,
        StatusClass::Malfunction => Color::Red,
    }
}

pub fn next_run_color(class: NextRunClass) -> Color {
    match class {
        NextRunClass::Scheduled => Color::Cyan,
        NextRunClass::None => Color::DarkGray,
    }
}

pub fn system_color(level: SystemLevel) -> Color {
    match level {
        SystemLevel::Ok => Color::Green,
        SystemLevel::Warning => Color::Yellow,
        SystemLevel::Error => Color::Red,
    }
}

pub fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    }
}

pub fn selected_border(is_selected: bool, color: Color) -> Style {
    if is_selected {
        Style::default().fg(Color::White).bold()
    } else {
        Style::default().fg(color)
    }
}
