//! Source viewer modal: pick a cited source and page through its chunks.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Widget, Wrap},
    Frame,
};

use crate::chat::SourceRef;

use super::ModalKeyResult;

/// One source as shown in the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub label: String,
    pub chunks: Vec<String>,
}

/// State for the source viewer.
#[derive(Debug)]
pub struct SourceModalState {
    sources: Vec<SourceEntry>,
    selected: usize,
    chunk: usize,
}

impl SourceModalState {
    /// Build the viewer for an answer's sources; `None` when there are none.
    pub fn new(sources: &[SourceRef]) -> Option<Self> {
        if sources.is_empty() {
            return None;
        }
        let sources = sources
            .iter()
            .enumerate()
            .map(|(index, source)| SourceEntry {
                label: source.label(index),
                chunks: source.chunk_texts(),
            })
            .collect();
        Some(Self {
            sources,
            selected: 0,
            chunk: 0,
        })
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Index of the chunk on screen within the selected source
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    fn current(&self) -> &SourceEntry {
        &self.sources[self.selected]
    }

    /// Up/Down pick a source, Left/Right step through its chunks.
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalKeyResult {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return ModalKeyResult::Close,
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.select(self.selected + 1),
            KeyCode::Left | KeyCode::Char('h') => self.chunk = self.chunk.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                let last = self.current().chunks.len().saturating_sub(1);
                self.chunk = (self.chunk + 1).min(last);
            }
            _ => {}
        }
        ModalKeyResult::Continue
    }

    fn select(&mut self, index: usize) {
        let index = index.min(self.sources.len() - 1);
        if index != self.selected {
            self.selected = index;
            self.chunk = 0;
        }
    }
}

/// Widget for rendering the source viewer.
pub struct SourceModal<'a> {
    state: &'a SourceModalState,
}

impl<'a> SourceModal<'a> {
    pub fn new(state: &'a SourceModalState) -> Self {
        Self { state }
    }

    /// Calculate the modal area (centered, 80% of the screen).
    pub fn calculate_area(total: Rect) -> Rect {
        let width = (total.width * 80 / 100)
            .max(40)
            .min(total.width.saturating_sub(2));
        let height = (total.height * 80 / 100)
            .max(10)
            .min(total.height.saturating_sub(2));

        let x = total.x + (total.width.saturating_sub(width)) / 2;
        let y = total.y + (total.height.saturating_sub(height)) / 2;

        Rect::new(x, y, width, height)
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        if area.width < 30 || area.height < 8 {
            return;
        }

        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Sources ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
        let columns =
            Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(rows[0]);

        self.render_list(frame, columns[0]);
        self.render_chunk(frame, columns[1]);
        frame.render_widget(help_line(), rows[1]);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .state
            .sources
            .iter()
            .map(|source| {
                ListItem::new(Line::from(vec![
                    Span::raw(source.label.clone()),
                    Span::styled(
                        format!(" ({})", source.chunks.len()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default().with_selected(Some(self.state.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_chunk(&self, frame: &mut Frame, area: Rect) {
        let source = self.state.current();
        let (title, body) = match source.chunks.get(self.state.chunk) {
            Some(text) => (
                format!(
                    " {} · fragment {} of {} ",
                    source.label,
                    self.state.chunk + 1,
                    source.chunks.len()
                ),
                text.as_str(),
            ),
            None => (
                format!(" {} ", source.label),
                "The backend sent no text for this source.",
            ),
        };

        let paragraph = Paragraph::new(body)
            .block(
                Block::default()
                    .title(Span::styled(title, Style::default().fg(Color::Yellow)))
                    .borders(Borders::NONE),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

fn help_line() -> impl Widget {
    Paragraph::new(Line::from(vec![
        Span::styled(" ↑/↓ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("source "),
        Span::styled(" ←/→ ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("fragment "),
        Span::styled(" Esc ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("close"),
    ]))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center)
}
