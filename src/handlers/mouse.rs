use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Focus};

/// Lines moved per wheel notch
const SCROLL_LINES: usize = 3;

fn contains(area: Option<Rect>, col: u16, row: u16) -> bool {
    area.is_some_and(|a| a.contains(Position::new(col, row)))
}

pub(crate) fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    // Modals own the screen
    if app.modal_state.is_open() {
        return;
    }

    let over_sidebar = contains(app.sidebar_state.list_area, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let count = app.conversations.len();
            if let Some(index) = app.sidebar_state.index_at(mouse.column, mouse.row, count) {
                app.select_index(index);
                app.set_focus(Focus::Sidebar);
            } else if contains(app.input_area, mouse.column, mouse.row) {
                app.set_focus(Focus::Input);
            }
        }
        MouseEventKind::ScrollUp if over_sidebar => app.navigate_up(),
        MouseEventKind::ScrollDown if over_sidebar => app.navigate_down(),
        MouseEventKind::ScrollUp => app.scroll_chat_up(SCROLL_LINES),
        MouseEventKind::ScrollDown => app.scroll_chat_down(SCROLL_LINES),
        _ => {}
    }
}
