use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use engine::{ScreenStatus, colors};

use crate::{
    app::AppState,
    ui::theme::{Theme, rgb},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let categories = state.categories.categories();

    if categories.is_empty() {
        super::render_status(
            frame,
            area,
            state.categories.status(),
            "No categories yet. Press n to add one.",
        );
        return;
    }

    let items = categories
        .iter()
        .map(|category| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    "● ",
                    Style::default().fg(rgb(colors::category_color(category))),
                ),
                Span::styled(category.name.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  #{}", category.category_id),
                    Style::default().fg(theme.text_muted),
                ),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.category_selected));

    let title = match state.categories.status() {
        ScreenStatus::Loading => " Categories (loading…) ".to_string(),
        ScreenStatus::Error(err) => format!(" Categories (stale: {err}) "),
        ScreenStatus::Ready => format!(" Categories ({}) ", categories.len()),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}
