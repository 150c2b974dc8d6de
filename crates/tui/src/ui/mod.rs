pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

use components::hints;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Spendings => screens::spendings::render(frame, layout[2], state),
        Section::Categories => screens::categories::render(frame, layout[2], state),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    screens::form::render(frame, area, state);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let status = match state.section {
        Section::Spendings => state.spendings.status(),
        Section::Categories => state.categories.status(),
    };
    let (label, style) = if status.is_loading() {
        ("LOADING", Style::default().fg(theme.text_muted))
    } else if status.error().is_some() {
        ("ERR", Style::default().fg(theme.error))
    } else {
        ("OK", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("DB", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.db)),
        Span::styled("TZ", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.tz)),
        Span::styled(label, style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let context = match (&state.form, state.section) {
        (Some(_), _) => hints::FORM,
        (None, Section::Spendings) => hints::SPENDING_LIST,
        (None, Section::Categories) => hints::CATEGORY_LIST,
    };

    let mut parts = vec![Span::raw(" ")];
    parts.extend(hints::hints_to_spans(context, theme));
    if state.form.is_none() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(hints::GLOBAL, theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
