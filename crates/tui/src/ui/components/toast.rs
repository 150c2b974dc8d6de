use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::{ToastLevel, ToastState},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();

    let mut lines = vec![Line::from(toast.message.as_str())];
    if toast.is_blocking() {
        lines.push(Line::styled(
            "press any key",
            Style::default().fg(theme.text_muted),
        ));
    }

    let inner_width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or_default();
    let width = (inner_width + 4).min(area.width as usize) as u16;
    let height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(width);
    let y = area
        .y
        .saturating_add(area.height.saturating_sub(height + 1));
    let rect = Rect { x, y, width, height };

    let style = match toast.level {
        ToastLevel::Info => Style::default().fg(theme.text),
        ToastLevel::Success => Style::default().fg(theme.positive),
        ToastLevel::Error => Style::default().fg(theme.error),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style);
    let content = Paragraph::new(lines)
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, rect);
    frame.render_widget(content.block(block), rect);
}
