//! Message transcript of the active conversation.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::chat::{Conversation, Message, Role};
use crate::ui::sidebar::SPINNER_FRAMES;

/// Columns of indentation before message bodies
const BODY_INDENT: usize = 2;

/// Scroll position of the transcript, in lines from the bottom.
#[derive(Debug, Default, Clone)]
pub struct ChatPaneState {
    /// 0 keeps the newest line in view
    pub scroll: usize,
}

impl ChatPaneState {
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Jump back to the newest message
    pub fn reset(&mut self) {
        self.scroll = 0;
    }
}

/// Widget drawing the messages of one conversation.
pub struct ChatPane<'a> {
    conversation: Option<&'a Conversation>,
    spinner_tick: usize,
}

impl<'a> ChatPane<'a> {
    pub fn new(conversation: Option<&'a Conversation>, spinner_tick: usize) -> Self {
        Self {
            conversation,
            spinner_tick,
        }
    }
}

impl StatefulWidget for ChatPane<'_> {
    type State = ChatPaneState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(conversation) = self.conversation else {
            return;
        };

        if conversation.messages.is_empty() && !conversation.is_processing {
            render_welcome(inner, buf);
            return;
        }

        let lines = build_lines(conversation, usize::from(inner.width), self.spinner_tick);
        let height = usize::from(inner.height);
        let max_scroll = lines.len().saturating_sub(height);
        state.scroll = state.scroll.min(max_scroll);

        let top = max_scroll - state.scroll;
        let visible: Vec<Line> = lines.into_iter().skip(top).take(height).collect();
        Paragraph::new(visible).render(inner, buf);

        if state.scroll > 0 {
            let hint = format!(" ↓ {} more ", state.scroll);
            let width = u16::try_from(hint.chars().count()).unwrap_or(area.width);
            if width + 2 < area.width {
                let hint_area = Rect::new(area.right() - width - 1, area.bottom() - 1, width, 1);
                Paragraph::new(Span::styled(hint, Style::default().fg(Color::Yellow)))
                    .render(hint_area, buf);
            }
        }
    }
}

fn render_welcome(area: Rect, buf: &mut Buffer) {
    let top_padding = area.height.saturating_sub(2) / 2;
    let mut lines = vec![Line::raw(""); usize::from(top_padding)];
    lines.push(Line::from(Span::styled(
        "Start a new conversation",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "Ask a question about your uploaded documents",
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Lay out every message of `conversation` for a pane `width` columns wide.
pub fn build_lines(conversation: &Conversation, width: usize, spinner_tick: usize) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(BODY_INDENT).max(1);
    let mut lines = Vec::new();

    for message in &conversation.messages {
        push_message(&mut lines, message, body_width);
        lines.push(Line::raw(""));
    }

    if conversation.is_processing {
        let frame = SPINNER_FRAMES[spinner_tick % SPINNER_FRAMES.len()];
        lines.push(Line::from(vec![
            Span::styled(format!("{frame} "), Style::default().fg(Color::Yellow)),
            Span::styled(
                "Assistant is thinking…",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    } else {
        // Trailing spacer after the last message
        lines.pop();
    }

    lines
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &Message, body_width: usize) {
    let (label_style, body_style) = match message.role {
        Role::User => (
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        ),
        Role::Assistant if message.content.starts_with("Error: ") => (
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Red),
        ),
        Role::Assistant => (
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Gray),
        ),
    };

    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    lines.push(Line::from(vec![
        Span::styled(message.role.label(), label_style),
        Span::styled(format!(" · {time}"), Style::default().fg(Color::DarkGray)),
    ]));

    let indent = " ".repeat(BODY_INDENT);
    for row in wrap_text(&message.content, body_width) {
        lines.push(Line::from(Span::styled(format!("{indent}{row}"), body_style)));
    }

    let Some(sources) = message.sources.as_ref().filter(|s| !s.is_empty()) else {
        return;
    };
    lines.push(Line::from(Span::styled(
        format!("{indent}Sources ({}):", sources.len()),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    for (index, source) in sources.iter().enumerate() {
        let mut entry = format!("{indent}  • {}", source.label(index));
        if let Some(chunks) = source.chunk_count() {
            let noun = if chunks == 1 { "chunk" } else { "chunks" };
            entry.push_str(&format!(" ({chunks} {noun})"));
        }
        lines.push(Line::from(Span::styled(
            entry,
            Style::default().fg(Color::DarkGray),
        )));
    }
}

/// Word-wrap `text` to `width` columns.
///
/// Paragraph breaks are kept, blank paragraphs become empty rows, and words
/// longer than a row are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            if current_len > 0 && current_len + 1 + word.len() > width {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }

            while word.len() > width {
                if current_len > 0 {
                    rows.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                rows.push(word.into_iter().collect());
                word = rest;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        rows.push(current);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::SourceRef;
    use chrono::Utc;
    use serde_json::json;

    fn message(role: Role, content: &str, sources: Option<Vec<SourceRef>>) -> Message {
        Message {
            role,
            content: content.to_string(),
            sources,
            timestamp: Utc::now(),
        }
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn wrap_text_breaks_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn wrap_text_keeps_paragraphs_and_blank_lines() {
        assert_eq!(wrap_text("one\n\ntwo", 20), vec!["one", "", "two"]);
        assert_eq!(wrap_text("", 20), vec![""]);
    }

    #[test]
    fn wrap_text_splits_long_words() {
        assert_eq!(wrap_text("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn build_lines_renders_header_body_and_sources() {
        let mut conversation = Conversation::new("c1".to_string());
        conversation
            .messages
            .push(message(Role::User, "What is the refund policy?", None));
        conversation.messages.push(message(
            Role::Assistant,
            "Thirty days.",
            Some(vec![
                SourceRef(json!({"filename": "policy.pdf", "chunks": [1, 2]})),
                SourceRef(json!({})),
            ]),
        ));

        let text: Vec<String> = build_lines(&conversation, 80, 0).iter().map(plain).collect();

        assert!(text[0].starts_with("You · "));
        assert_eq!(text[1], "  What is the refund policy?");
        assert_eq!(text[2], "");
        assert!(text[3].starts_with("Assistant · "));
        assert_eq!(text[4], "  Thirty days.");
        assert_eq!(text[5], "  Sources (2):");
        assert_eq!(text[6], "    • policy.pdf (2 chunks)");
        assert_eq!(text[7], "    • Source 2");
        assert_eq!(text.len(), 8);
    }

    #[test]
    fn build_lines_shows_thinking_indicator_while_processing() {
        let mut conversation = Conversation::new("c1".to_string());
        conversation.messages.push(message(Role::User, "Hi", None));
        conversation.is_processing = true;

        let lines = build_lines(&conversation, 40, 1);
        let last = plain(lines.last().unwrap());

        assert!(last.contains("Assistant is thinking"));
        assert!(last.starts_with(SPINNER_FRAMES[1]));
    }

    #[test]
    fn scroll_is_clamped_during_render() {
        let mut conversation = Conversation::new("c1".to_string());
        for i in 0..10 {
            conversation
                .messages
                .push(message(Role::User, &format!("question {i}"), None));
        }
        let mut state = ChatPaneState { scroll: 10_000 };
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);

        ChatPane::new(Some(&conversation), 0).render(area, &mut buf, &mut state);

        // 10 messages * 3 lines - trailing spacer = 29 lines, 10 visible rows
        assert_eq!(state.scroll, 19);
    }
}
