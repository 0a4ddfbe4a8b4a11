//! Sidebar widget listing every conversation, active one highlighted.

mod items;
mod rendering;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;

pub use items::{build_list_items, format_relative, SPINNER_FRAMES};
pub use rendering::Sidebar;

/// Terminal rows used by one conversation entry (title + details line)
pub const ITEM_HEIGHT: u16 = 2;

/// Sidebar widget state: list scroll position and the area it was last drawn in.
#[derive(Default)]
pub struct SidebarState {
    /// Ratatui list selection state (mirrors the active conversation)
    pub list_state: ListState,
    /// Inner list area from the last render, used for mouse hit testing
    pub list_area: Option<Rect>,
}

impl SidebarState {
    /// Create a new sidebar state with the first item selected.
    pub fn new() -> Self {
        let mut state = Self::default();
        state.list_state.select(Some(0));
        state
    }

    /// Map a screen position to the index of the conversation drawn there.
    pub fn index_at(&self, col: u16, row: u16, count: usize) -> Option<usize> {
        let area = self.list_area?;
        if col < area.x || col >= area.x + area.width || row < area.y || row >= area.y + area.height
        {
            return None;
        }

        let index = self.list_state.offset() + usize::from((row - area.y) / ITEM_HEIGHT);
        (index < count).then_some(index)
    }
}
