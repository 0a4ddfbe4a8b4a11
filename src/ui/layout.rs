use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::config::{LayoutConfig, SidebarPosition};

/// Split the screen into sidebar, chat area and a one-line help bar,
/// honoring the configured sidebar width and side.
pub fn create_layout_with_help_config(area: Rect, layout: &LayoutConfig) -> (Rect, Rect, Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let main_area = vertical[0];
    let help_area = vertical[1];

    let sidebar_pct = u16::from(layout.sidebar_width_pct.clamp(10, 50));
    let chat_pct = 100 - sidebar_pct;

    let (sidebar_area, chat_area) = match layout.sidebar_position {
        SidebarPosition::Left => {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(sidebar_pct),
                    Constraint::Percentage(chat_pct),
                ])
                .split(main_area);
            (horizontal[0], horizontal[1])
        }
        SidebarPosition::Right => {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(chat_pct),
                    Constraint::Percentage(sidebar_pct),
                ])
                .split(main_area);
            (horizontal[1], horizontal[0])
        }
    };

    (sidebar_area, chat_area, help_area)
}

/// Split the chat area into header, message history and input box
pub fn split_chat_area(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}
