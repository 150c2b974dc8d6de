use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::TransactionType;
use engine::{ScreenStatus, SortKey, SortState};

use crate::{
    app::{AppState, format_date},
    ui::theme::{Theme, rgb},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_sort_header(frame, layout[0], state.spendings.sort_state(), &theme);

    if state.spendings.items().is_empty() {
        super::render_status(
            frame,
            layout[1],
            state.spendings.status(),
            "No spendings yet. Press n to add one.",
        );
        return;
    }
    render_list(frame, layout[1], state, &theme);
}

fn render_sort_header(frame: &mut Frame<'_>, area: Rect, sort: SortState, theme: &Theme) {
    let mut spans = vec![Span::styled(" Sort: ", Style::default().fg(theme.text_muted))];
    for (index, key) in [SortKey::Date, SortKey::Amount, SortKey::Category]
        .into_iter()
        .enumerate()
    {
        let label = format!("{} {}", index + 1, key.label());
        if key == sort.key {
            spans.push(Span::styled(
                format!("{label} {}", sort.direction.arrow()),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
        spans.push(Span::raw("   "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let items = state
        .spendings
        .rows()
        .into_iter()
        .map(|row| {
            let spending = row.spending;
            let date = format_date(spending.date_of_spending, state.tz);
            let amount_style = match spending.transaction_type() {
                TransactionType::Income => Style::default().fg(theme.positive),
                TransactionType::Spending => Style::default().fg(theme.negative),
            };
            let amount = spending.amount.format_with(&spending.currency);
            let description = spending.description.clone().unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme.text_muted)),
                Span::styled(format!("{amount:>16}  "), amount_style),
                Span::styled("● ", Style::default().fg(rgb(row.color))),
                Span::styled(
                    format!("{:<18}", row.category),
                    Style::default().fg(theme.text),
                ),
                Span::raw(description),
            ]))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.spending_selected));

    let title = match state.spendings.status() {
        ScreenStatus::Loading => " Spendings (loading…) ".to_string(),
        ScreenStatus::Error(err) => format!(" Spendings (stale: {err}) "),
        ScreenStatus::Ready => format!(" Spendings ({}) ", state.spendings.items().len()),
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
