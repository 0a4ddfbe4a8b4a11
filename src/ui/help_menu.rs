//! Help menu overlay showing the sidebar keybindings.
//!
//! Toggled by `?` while the sidebar has focus. Displays a popup
//! with all available keybindings organized into rows.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// A single keybinding entry for display
struct HelpEntry {
    key: &'static str,
    label: &'static str,
}

/// Widget that renders the help menu overlay
#[derive(Default)]
pub struct HelpMenuWidget;

impl HelpMenuWidget {
    /// Create a new help menu widget
    pub fn new() -> Self {
        Self
    }

    /// Calculate the area for the help menu popup.
    /// Positioned at the bottom of the screen, above the help bar.
    pub fn calculate_area(screen: Rect) -> Rect {
        let entries = Self::entries();
        let commands_per_row = 5;
        let row_count = entries.len().div_ceil(commands_per_row);
        let height = row_count as u16 + 2; // +2 for top border + padding
        let y = screen.height.saturating_sub(height + 1); // +1 for help bar

        Rect {
            x: 0,
            y,
            width: screen.width,
            height,
        }
    }

    /// All sidebar-mode keybinding entries
    fn entries() -> Vec<HelpEntry> {
        vec![
            HelpEntry { key: "j/k", label: "switch" },
            HelpEntry { key: "n", label: "new" },
            HelpEntry { key: "dd", label: "delete" },
            HelpEntry { key: "r", label: "rename" },
            HelpEntry { key: "CC", label: "clear" },
            HelpEntry { key: "i", label: "ask" },
            HelpEntry { key: "Tab", label: "focus" },
            HelpEntry { key: "s", label: "sources" },
            HelpEntry { key: "y", label: "yank answer" },
            HelpEntry { key: "PgUp/Dn", label: "scroll" },
            HelpEntry { key: "End", label: "latest" },
            HelpEntry { key: "p", label: "sidebar side" },
            HelpEntry { key: "h", label: "health" },
            HelpEntry { key: "?", label: "help" },
            HelpEntry { key: "q", label: "quit" },
            HelpEntry { key: "C-c", label: "quit" },
        ]
    }

    /// Build command display lines grouped into rows
    fn build_command_lines() -> Vec<Line<'static>> {
        let entries = Self::entries();
        let commands_per_row = 5;
        let mut lines = Vec::new();

        for chunk in entries.chunks(commands_per_row) {
            let spans: Vec<Span> = chunk
                .iter()
                .flat_map(|entry| {
                    vec![
                        Span::styled(
                            format!(" {} ", entry.key),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!("{} ", entry.label),
                            Style::default().fg(Color::White),
                        ),
                    ]
                })
                .collect();

            lines.push(Line::from(spans));
        }

        lines
    }
}

impl Widget for HelpMenuWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (overlay effect)
        Clear.render(area, buf);

        // Build content
        let command_lines = Self::build_command_lines();

        let block = Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " ? | Keybindings ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(Color::Black));

        let paragraph = Paragraph::new(command_lines)
            .block(block)
            .style(Style::default().bg(Color::Black));

        paragraph.render(area, buf);
    }
}
