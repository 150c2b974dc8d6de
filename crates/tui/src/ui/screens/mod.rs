pub mod categories;
pub mod form;
pub mod spendings;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
};

use engine::ScreenStatus;

use crate::ui::theme::Theme;

/// Placeholder shown while a screen has nothing to list yet.
fn render_status(frame: &mut Frame<'_>, area: Rect, status: &ScreenStatus, empty: &str) {
    let theme = Theme::default();
    let (text, style) = match status {
        ScreenStatus::Loading => ("Loading…".to_string(), Style::default().fg(theme.text_muted)),
        ScreenStatus::Error(err) => (
            format!("{err}  (r to retry)"),
            Style::default().fg(theme.error),
        ),
        ScreenStatus::Ready => (empty.to_string(), Style::default().fg(theme.text_muted)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
