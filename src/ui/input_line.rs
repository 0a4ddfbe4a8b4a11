//! Single-line text editor used by the question box and the rename modal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

/// Outcome of feeding a key to an [`InputLine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKeyResult {
    /// Key ignored or only moved the cursor
    Continue,
    /// Text changed
    Changed,
    /// Enter pressed
    Submit,
    /// Esc pressed
    Cancel,
}

/// Editable text with a cursor counted in chars.
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    text: String,
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `text`, cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Insert pasted text at the cursor. Line breaks and tabs become spaces,
    /// other control characters are dropped.
    pub fn insert_paste(&mut self, pasted: &str) -> InputKeyResult {
        let cleaned: String = pasted
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();
        if cleaned.is_empty() {
            return InputKeyResult::Continue;
        }

        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, &cleaned);
        self.cursor += cleaned.chars().count();
        InputKeyResult::Changed
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputKeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => InputKeyResult::Submit,
            KeyCode::Esc => InputKeyResult::Cancel,
            KeyCode::Char('u') if ctrl => {
                if self.text.is_empty() {
                    return InputKeyResult::Continue;
                }
                self.clear();
                InputKeyResult::Changed
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputKeyResult::Continue
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.len();
                InputKeyResult::Continue
            }
            KeyCode::Char(_) if ctrl => InputKeyResult::Continue,
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                InputKeyResult::Changed
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputKeyResult::Continue;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                InputKeyResult::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.len() {
                    return InputKeyResult::Continue;
                }
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                InputKeyResult::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputKeyResult::Continue
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                InputKeyResult::Continue
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputKeyResult::Continue
            }
            KeyCode::End => {
                self.cursor = self.len();
                InputKeyResult::Continue
            }
            _ => InputKeyResult::Continue,
        }
    }

    /// Draw the text inside `block`, scrolled so the cursor stays visible.
    ///
    /// The terminal cursor is placed only when `focused` is set.
    pub fn render(&self, frame: &mut Frame, area: Rect, block: Block, focused: bool) {
        let inner = block.inner(area);
        let width = usize::from(inner.width.max(1));

        let start = (self.cursor + 1).saturating_sub(width);
        let visible: String = self.text.chars().skip(start).take(width).collect();

        let line = if self.text.is_empty() && !focused {
            Line::from(Span::styled(
                "Press i to ask a question",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(visible)
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if focused {
            let offset = u16::try_from(self.cursor - start).unwrap_or(inner.width);
            frame.set_cursor_position(Position::new(inner.x + offset, inner.y));
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
