//! Sidebar widget rendering: the `Sidebar` struct and its `StatefulWidget` implementation.

use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, StatefulWidget, Widget},
};

use crate::chat::ConversationManager;

use super::items::build_list_items;
use super::SidebarState;

/// Width of the highlight symbol drawn before the selected entry
const HIGHLIGHT_WIDTH: usize = 2;

/// Sidebar widget for displaying conversations.
pub struct Sidebar<'a> {
    conversations: &'a ConversationManager,
    /// Whether the sidebar has keyboard focus
    focused: bool,
    /// Animation frame for processing indicators
    spinner_tick: usize,
}

impl<'a> Sidebar<'a> {
    /// Create a new sidebar widget.
    pub fn new(conversations: &'a ConversationManager, focused: bool, spinner_tick: usize) -> Self {
        Self {
            conversations,
            focused,
            spinner_tick,
        }
    }
}

impl StatefulWidget for Sidebar<'_> {
    type State = SidebarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let processing = self
            .conversations
            .conversations()
            .iter()
            .filter(|c| c.is_processing)
            .count();
        let title = if processing > 0 {
            format!(" Conversations ({processing} waiting) ")
        } else {
            format!(" Conversations ({}) ", self.conversations.len())
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner_area = block.inner(area);
        block.render(area, buf);
        state.list_area = Some(inner_area);

        let active_index = self.conversations.active_index();
        state.list_state.select(active_index);

        let title_width = usize::from(inner_area.width).saturating_sub(HIGHLIGHT_WIDTH);
        let items = build_list_items(
            self.conversations.conversations(),
            active_index,
            self.spinner_tick,
            Utc::now(),
            title_width,
        );

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        StatefulWidget::render(list, inner_area, buf, &mut state.list_state);
    }
}
