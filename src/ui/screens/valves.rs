use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Gauge, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, InputMode},
    chart::{ChartGeometry, FlowChart},
    reconcile::{PanelContent, ValveCard},
    session::{DraftField, ScheduleDraft, ScheduleSlot, SEASONS, WEEKDAYS},
    ui::{
        components::UiComponent,
        style::{dim_unless_focused, next_run_color, selected_border, status_color},
    },
    util::time_format::format_sample_time,
};

/// Border plus status, progress and next-run rows.
const CARD_HEIGHT: u16 = 5;
const CHART_HEIGHT: u16 = 11;

pub fn render_valves(app: &mut App, area: Rect, buf: &mut Buffer) {
    let show_chart = app
        .status
        .as_ref()
        .and_then(|s| s.waterflow.as_ref())
        .is_some_and(|w| w.enabled);

    let (main_area, chart_area) = if show_chart && area.height > CHART_HEIGHT + CARD_HEIGHT {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(CARD_HEIGHT), Constraint::Length(CHART_HEIGHT)])
            .split(area);
        (rows[0], Some(rows[1]))
    } else {
        (area, None)
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_area);

    render_cards(app, columns[0], buf);
    render_detail_panel(app, columns[1], buf);

    match chart_area {
        Some(chart_area) => render_flow(app, chart_area, buf),
        None => {
            app.chart_geometry = None;
            app.hovered = None;
        }
    }
}

fn render_cards(app: &App, area: Rect, buf: &mut Buffer) {
    let cards = app.tree.cards();
    if cards.is_empty() {
        let text = if app.status.is_some() { "No valves configured" } else { "Waiting for first status..." };
        UiComponent::empty_message(text, Some("Valves")).render(area, buf);
        return;
    }

    let container = Block::bordered()
        .title(format!(" Valves ({}) ", cards.len()))
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = container.inner(area);
    container.render(area, buf);

    // Scroll so the selected card stays on screen.
    let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first = app.selected_valve.saturating_sub(visible - 1);

    for (slot, (index, card)) in cards.iter().enumerate().skip(first).take(visible).enumerate() {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + slot as u16 * CARD_HEIGHT,
            width: inner.width,
            height: CARD_HEIGHT.min(inner.bottom().saturating_sub(inner.y + slot as u16 * CARD_HEIGHT)),
        };
        render_card(card, index == app.selected_valve, card_area, buf);
    }
}

fn render_card(card: &ValveCard, is_selected: bool, area: Rect, buf: &mut Buffer) {
    if area.height < 3 {
        return;
    }
    let color = status_color(card.status.class);
    let mut block = Block::bordered()
        .title(format!(" {} ", card.name))
        .border_type(BorderType::Rounded)
        .border_style(selected_border(is_selected, color));
    if card.detail_panel.is_some() {
        block = block.title_bottom(Line::from(" schedules ▸ ").right_aligned());
    }
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let mut status = vec![Span::styled(
        card.status.text.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if let Some(badge) = &card.queue_badge {
        status.push(Span::raw("  "));
        status.push(Span::styled(format!("[{}]", badge.text), Style::default().fg(Color::Magenta)));
    }
    // Right-aligned parts go first so the left text stays on top when the
    // card is narrow.
    Paragraph::new(Line::from(Span::styled(
        format!("Today {}", card.daily_total.text),
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Right)
    .render(rows[0], buf);
    Paragraph::new(Line::from(status)).render(rows[0], buf);

    match &card.progress {
        Some(progress) => Gauge::default()
            .ratio(progress.ratio.clamp(0.0, 1.0))
            .label(format!("{} left", progress.remaining_text))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
            .render(rows[1], buf),
        None => Paragraph::new("idle").dim().render(rows[1], buf),
    }

    let start_stop = if card.stop_enabled() { "x Stop" } else { "s Start" };
    Paragraph::new(Line::from(Span::styled(
        format!(
            "{} · t {} · p {}",
            start_stop,
            card.actions.enable_toggle.control.label(),
            card.actions.suspend_toggle.control.label(),
        ),
        dim_unless_focused(is_selected, Style::default().fg(Color::White)),
    )))
    .alignment(Alignment::Right)
    .render(rows[2], buf);
    Paragraph::new(Line::from(vec![
        Span::styled("Next ", Style::default().fg(Color::Gray)),
        Span::styled(card.next_run.text.clone(), Style::default().fg(next_run_color(card.next_run.class))),
    ]))
    .render(rows[2], buf);
}

fn render_detail_panel(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(valve) = app.selected_valve_name() else {
        UiComponent::empty_message("Select a valve", Some("Schedules")).render(area, buf);
        return;
    };
    let Some(panel) = app.tree.panel(&valve) else {
        UiComponent::empty_message("Press Enter to show schedules", Some("Schedules")).render(area, buf);
        return;
    };

    let block = Block::bordered()
        .title(format!(" {} schedules ", valve))
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));

    let lines = match &panel.content {
        PanelContent::Loading => vec![Line::from("Loading...").italic().fg(Color::Gray)],
        PanelContent::Failed(message) => vec![Line::from(message.clone()).fg(Color::Red)],
        PanelContent::Loaded(detail) => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Type ", Style::default().fg(Color::Gray)),
                    Span::raw(detail.valve_type.clone()),
                    Span::styled("   Sensor ", Style::default().fg(Color::Gray)),
                    Span::raw(detail.sensor_name.clone().unwrap_or_else(|| "none".to_string())),
                ]),
                Line::from(""),
            ];
            for slot in app.schedule_slots(&valve) {
                let selected = app.selected_schedule == Some(slot);
                let editing = matches!(&app.mode, InputMode::EditSchedule { valve: v, slot: s } if *v == valve && *s == slot);
                match app.session.draft(&valve, slot) {
                    Some(draft) => lines.extend(draft_lines(draft, slot, editing)),
                    None => lines.push(schedule_line(detail.schedules.as_slice(), slot, selected)),
                }
            }
            lines
        }
    };

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .render(area, buf);
}

fn schedule_line(schedules: &[crate::api::Schedule], slot: ScheduleSlot, selected: bool) -> Line<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let text = match slot {
        ScheduleSlot::New => "+ new schedule".to_string(),
        ScheduleSlot::Existing(index) => match schedules.get(index) {
            Some(schedule) => format!(
                "#{} {} for {} min · {} · {}{}",
                index + 1,
                schedule.start_description(),
                schedule.duration,
                schedule.days.join(" "),
                schedule.seasons.join(" "),
                if schedule.enable_uv_adjustments { " · UV" } else { "" },
            ),
            None => format!("#{} (gone)", index + 1),
        },
    };
    Line::from(format!("{}{}", marker, text)).style(style)
}

fn draft_lines(draft: &ScheduleDraft, slot: ScheduleSlot, editing: bool) -> Vec<Line<'static>> {
    let title = match slot {
        ScheduleSlot::New => "New schedule".to_string(),
        ScheduleSlot::Existing(index) => format!("Editing #{}", index + 1),
    };
    let mut lines = vec![Line::from(title).fg(Color::Yellow).bold()];

    for field in DraftField::ORDER {
        if !draft.is_relevant(field) {
            continue;
        }
        let focused = editing && draft.focus == field;
        let value_style = dim_unless_focused(focused, Style::default().fg(Color::Cyan));
        let cursor = if focused { "_" } else { "" };

        let mut spans = vec![Span::styled(
            format!("  {:<15}", field.label()),
            Style::default().fg(Color::Gray),
        )];
        match field {
            DraftField::TimeBase => spans.push(Span::styled(draft.time_based_on.as_str(), value_style)),
            DraftField::StartTime => spans.push(Span::styled(format!("{}{}", draft.start_time, cursor), value_style)),
            DraftField::Offset => spans.push(Span::styled(format!("{}{}", draft.offset, cursor), value_style)),
            DraftField::Duration => spans.push(Span::styled(format!("{}{}", draft.duration, cursor), value_style)),
            DraftField::Days => spans.extend(flag_spans(&WEEKDAYS, &draft.days, focused.then_some(draft.cursor), value_style)),
            DraftField::Seasons => spans.extend(flag_spans(&SEASONS, &draft.seasons, focused.then_some(draft.cursor), value_style)),
            DraftField::UvAdjustments => spans.push(Span::styled(
                if draft.enable_uv_adjustments { "[x]" } else { "[ ]" },
                value_style,
            )),
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn flag_spans(names: &[&'static str], flags: &[bool], cursor: Option<usize>, style: Style) -> Vec<Span<'static>> {
    names
        .iter()
        .zip(flags)
        .enumerate()
        .map(|(i, (name, on))| {
            let mark = if *on { "x" } else { " " };
            let style = if cursor == Some(i) { style.reversed() } else { style };
            Span::styled(format!("[{}]{} ", mark, name), style)
        })
        .collect()
}

fn render_flow(app: &mut App, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered()
        .title(" Water flow ")
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    if let Some(waterflow) = app.status.as_ref().and_then(|s| s.waterflow.as_ref()) {
        let (activity, activity_color) = if waterflow.is_active {
            ("flowing", Color::Green)
        } else {
            ("idle", Color::Gray)
        };
        let mut spans = vec![
            Span::styled(format!("{:.1} L/min", waterflow.flow_rate), Style::default().bold()),
            Span::raw("  "),
            Span::styled(activity, Style::default().fg(activity_color)),
            Span::styled(
                if waterflow.leak_detection_enabled { "  leak detection on" } else { "  leak detection off" },
                Style::default().fg(Color::Gray),
            ),
        ];
        if let Some(updated) = &waterflow.last_update {
            spans.push(Span::styled(
                format!("  updated {}", format_sample_time(updated)),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Paragraph::new(Line::from(spans)).render(rows[0], buf);
    }

    let plot = rows[1];
    app.chart_geometry = Some(ChartGeometry::new(plot));
    app.update_hover();
    FlowChart::new(&app.chart)
        .tooltip(app.hovered.as_ref())
        .render(plot, buf);
}
