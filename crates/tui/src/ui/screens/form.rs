use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use engine::colors;

use crate::{
    app::{AppState, Field, FormState},
    ui::theme::{Theme, rgb},
};

const LABEL_WIDTH: usize = 12;

/// Calculates a centered rect for the form box.
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(form) = &state.form else {
        return;
    };
    let theme = Theme::default();

    let fields = form.fields();
    let height = fields.len() as u16 + 4;
    let card_area = centered_box(56.min(area.width), height.min(area.height), area);
    frame.render_widget(Clear, card_area);

    let title = if state.saving {
        format!("{}(saving…) ", form.title())
    } else {
        form.title().to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let lines = fields
        .iter()
        .map(|&field| field_line(form, field, state, &theme))
        .collect::<Vec<_>>();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0)])
        .margin(1)
        .split(inner);
    frame.render_widget(Paragraph::new(lines), rows[0]);
}

fn field_line(form: &FormState, field: Field, state: &AppState, theme: &Theme) -> Line<'static> {
    let focused = form.focused() == field;
    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let mut spans = vec![Span::styled(
        format!("{:<LABEL_WIDTH$}", field.label()),
        label_style,
    )];

    match field {
        Field::Category => {
            let category = form.category_id.and_then(|id| {
                state
                    .categories
                    .categories()
                    .iter()
                    .find(|category| category.category_id == id)
                    .cloned()
            });
            match category {
                Some(category) => {
                    spans.push(Span::styled(
                        "● ",
                        Style::default().fg(rgb(colors::category_color(&category))),
                    ));
                    spans.push(Span::styled(category.name, Style::default().fg(theme.text)));
                }
                None => spans.push(Span::styled(
                    "none (add a category first)",
                    Style::default().fg(theme.error),
                )),
            }
        }
        _ => {
            let value = form.value(field).to_string();
            let value = if value.is_empty() && field == Field::Date && !focused {
                "now".to_string()
            } else {
                value
            };
            spans.push(Span::styled(value, Style::default().fg(theme.text)));
        }
    }

    if focused {
        let marker = if field.is_picker() { "  ◂▸" } else { "│" };
        spans.push(Span::styled(marker, Style::default().fg(theme.accent)));
    }

    Line::from(spans)
}
