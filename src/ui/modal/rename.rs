//! Conversation rename modal dialog.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

use crate::chat::ConversationId;
use crate::ui::input_line::{InputKeyResult, InputLine};

use super::ModalKeyResult;

/// State for the rename modal dialog.
pub struct RenameModalState {
    /// Conversation being renamed
    pub conversation_id: ConversationId,
    /// Title input, prefilled with the current title
    pub input: InputLine,
    /// Error message to display
    pub error_message: Option<String>,
}

impl RenameModalState {
    pub fn new(conversation_id: ConversationId, current_title: &str) -> Self {
        Self {
            conversation_id,
            input: InputLine::with_text(current_title),
            error_message: None,
        }
    }

    /// Handle key input. Enter yields the trimmed title unless it is blank.
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalKeyResult {
        match self.input.handle_key(key) {
            InputKeyResult::Submit => {
                let title = self.input.text().trim();
                if title.is_empty() {
                    self.error_message = Some("Title cannot be empty".to_string());
                    return ModalKeyResult::Continue;
                }
                ModalKeyResult::Renamed {
                    conversation_id: self.conversation_id.clone(),
                    title: title.to_string(),
                }
            }
            InputKeyResult::Cancel => ModalKeyResult::Close,
            InputKeyResult::Changed => {
                self.error_message = None;
                ModalKeyResult::Continue
            }
            InputKeyResult::Continue => ModalKeyResult::Continue,
        }
    }
}

/// Widget for rendering the rename modal.
pub struct RenameModal<'a> {
    state: &'a RenameModalState,
}

impl<'a> RenameModal<'a> {
    pub fn new(state: &'a RenameModalState) -> Self {
        Self { state }
    }

    /// Calculate the modal area (centered, ~40% width, 9 lines).
    pub fn calculate_area(total: Rect) -> Rect {
        let width = (total.width * 40 / 100)
            .max(36)
            .min(total.width.saturating_sub(4));
        let height = 9u16.min(total.height.saturating_sub(2));

        let x = total.x + (total.width.saturating_sub(width)) / 2;
        let y = total.y + (total.height.saturating_sub(height)) / 2;

        Rect::new(x, y, width, height)
    }

    /// Draw the dialog and place the terminal cursor in its input.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        if area.width < 20 || area.height < 7 {
            return;
        }

        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Rename Conversation ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Input field
            Constraint::Length(1), // Error message
            Constraint::Min(0),    // Spacer
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

        let input_block = Block::default()
            .title(" Title ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        self.state.input.render(frame, chunks[0], input_block, true);

        if let Some(ref error) = self.state.error_message {
            let error_line =
                Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)));
            frame.render_widget(Paragraph::new(error_line), chunks[1]);
        }

        frame.render_widget(help_line(), chunks[3]);
    }
}

fn help_line() -> impl Widget {
    Paragraph::new(Line::from(vec![
        Span::styled(" Enter ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("rename "),
        Span::styled(" Esc ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_returns_trimmed_title() {
        let mut state = RenameModalState::new("c1".to_string(), "Old");
        state.handle_key(key(KeyCode::Char(' ')));
        state.handle_key(key(KeyCode::Char('!')));

        assert_eq!(
            state.handle_key(key(KeyCode::Enter)),
            ModalKeyResult::Renamed {
                conversation_id: "c1".to_string(),
                title: "Old !".to_string(),
            }
        );
    }

    #[test]
    fn blank_title_shows_error_until_edited() {
        let mut state = RenameModalState::new("c1".to_string(), "");
        state.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(state.handle_key(key(KeyCode::Enter)), ModalKeyResult::Continue);
        assert!(state.error_message.is_some());

        state.handle_key(key(KeyCode::Char('x')));
        assert!(state.error_message.is_none());
    }

    #[test]
    fn esc_closes() {
        let mut state = RenameModalState::new("c1".to_string(), "Title");
        assert_eq!(state.handle_key(key(KeyCode::Esc)), ModalKeyResult::Close);
    }

    #[test]
    fn calculate_area_is_centered() {
        let area = RenameModal::calculate_area(Rect::new(0, 0, 100, 40));
        assert_eq!(area.width, 40);
        assert_eq!(area.height, 9);
        assert_eq!(area.x, 30);
        assert_eq!(area.y, 15);
    }
}
