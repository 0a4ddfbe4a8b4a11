use crate::ui::toast::{Toast, ToastType};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Narrowest and widest toast boxes, borders included
const MIN_WIDTH: u16 = 24;
const MAX_WIDTH: u16 = 56;

/// Stack of toasts drawn in the bottom-right corner, newest at the bottom.
pub struct ToastWidget<'a> {
    toasts: &'a [&'a Toast],
}

impl<'a> ToastWidget<'a> {
    pub fn new(toasts: &'a [&'a Toast]) -> Self {
        Self { toasts }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut bottom = area.bottom().saturating_sub(2);

        for toast in self.toasts.iter().rev() {
            let (width, height) = toast_size(&toast.message, area.width);
            if bottom < area.top() + height {
                break;
            }

            let toast_area = Rect::new(
                area.right().saturating_sub(width + 2),
                bottom - height,
                width,
                height,
            );
            bottom = toast_area.y.saturating_sub(1);

            frame.render_widget(Clear, toast_area);

            let accent = accent_style(toast.toast_type);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(accent)
                .style(Style::default().bg(Color::Black));

            let text = Paragraph::new(Line::from(vec![
                Span::styled(icon(toast.toast_type), accent.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::raw(toast.message.as_str()),
            ]))
            .wrap(Wrap { trim: true })
            .block(block);

            frame.render_widget(text, toast_area);
        }
    }
}

/// Box size for a message: as wide as the text allows, wrapping onto up to three lines.
fn toast_size(message: &str, screen_width: u16) -> (u16, u16) {
    let max_width = MAX_WIDTH.min(screen_width.saturating_sub(4)).max(MIN_WIDTH);
    let text_width = message.chars().count() as u16 + 2; // icon + space
    let width = (text_width + 2).clamp(MIN_WIDTH, max_width);
    let inner = width.saturating_sub(2).max(1);
    let lines = text_width.div_ceil(inner).clamp(1, 3);
    (width, lines + 2)
}

fn icon(toast_type: ToastType) -> &'static str {
    match toast_type {
        ToastType::Info => "ℹ",
        ToastType::Success => "✓",
        ToastType::Warning => "⚠",
        ToastType::Error => "✗",
    }
}

fn accent_style(toast_type: ToastType) -> Style {
    let color = match toast_type {
        ToastType::Info => Color::Cyan,
        ToastType::Success => Color::Green,
        ToastType::Warning => Color::Yellow,
        ToastType::Error => Color::Red,
    };
    Style::default().fg(color)
}
