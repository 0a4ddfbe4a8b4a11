//! Sidebar navigation and transcript scrolling on App.

use super::*;

/// Lines moved by one PageUp/PageDown press
const PAGE_SCROLL_LINES: usize = 10;

impl App {
    /// Activate the conversation above the current one
    pub fn navigate_up(&mut self) {
        if let Some(current) = self.conversations.active_index() {
            self.select_index(current.saturating_sub(1));
        }
    }

    /// Activate the conversation below the current one
    pub fn navigate_down(&mut self) {
        if let Some(current) = self.conversations.active_index() {
            let last = self.conversations.len().saturating_sub(1);
            self.select_index((current + 1).min(last));
        }
    }

    /// Activate the first conversation
    pub fn jump_to_first(&mut self) {
        self.select_index(0);
    }

    /// Activate the last conversation
    pub fn jump_to_last(&mut self) {
        self.select_index(self.conversations.len().saturating_sub(1));
    }

    /// Activate the conversation at `index` in sidebar order
    pub fn select_index(&mut self, index: usize) {
        let Some(id) = self
            .conversations
            .conversations()
            .get(index)
            .map(|c| c.id.clone())
        else {
            return;
        };
        if self.conversations.active_id() == Some(id.as_str()) {
            return;
        }
        if self.conversations.set_active(&id) {
            self.sidebar_state.list_state.select(Some(index));
            self.chat_state.reset();
            self.mark_dirty();
        }
    }

    /// Scroll the transcript towards older messages
    pub fn scroll_chat_up(&mut self, lines: usize) {
        self.chat_state.scroll_up(lines);
    }

    /// Scroll the transcript towards newer messages
    pub fn scroll_chat_down(&mut self, lines: usize) {
        self.chat_state.scroll_down(lines);
    }

    pub fn page_chat_up(&mut self) {
        self.scroll_chat_up(PAGE_SCROLL_LINES);
    }

    pub fn page_chat_down(&mut self) {
        self.scroll_chat_down(PAGE_SCROLL_LINES);
    }

    /// Show the newest message again
    pub fn jump_to_latest(&mut self) {
        self.chat_state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_app;

    #[test]
    fn navigation_moves_active_conversation_and_clamps() {
        let mut app = test_app();
        app.conversations.create_conversation();
        app.conversations.create_conversation();
        assert_eq!(app.conversations.active_index(), Some(2));

        app.navigate_down();
        assert_eq!(app.conversations.active_index(), Some(2));

        app.navigate_up();
        app.navigate_up();
        app.navigate_up();
        assert_eq!(app.conversations.active_index(), Some(0));

        app.jump_to_last();
        assert_eq!(app.conversations.active_index(), Some(2));
    }

    #[test]
    fn switching_conversation_resets_scroll() {
        let mut app = test_app();
        app.conversations.create_conversation();
        app.page_chat_up();
        assert_eq!(app.chat_state.scroll, 10);

        app.jump_to_first();

        assert_eq!(app.chat_state.scroll, 0);
        assert_eq!(app.sidebar_state.list_state.selected(), Some(0));
    }

    #[test]
    fn select_index_out_of_range_is_ignored() {
        let mut app = test_app();
        let before = app.conversations.active_id().map(str::to_string);

        app.select_index(42);

        assert_eq!(app.conversations.active_id().map(str::to_string), before);
    }
}
