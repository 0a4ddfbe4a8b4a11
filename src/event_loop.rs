use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{poll, read, Event};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::app::{App, BackendStatus, ChordState, Focus, ModalState};
use crate::handlers::keyboard::handle_key_event;
use crate::handlers::mouse::handle_mouse_event;
use crate::handlers::KeyAction;
use crate::ui::chat_pane::ChatPane;
use crate::ui::layout::{create_layout_with_help_config, split_chat_area};
use crate::ui::modal::{RenameModal, SourceModal};
use crate::ui::sidebar::Sidebar;
use crate::ui::toast_widget::ToastWidget;
use crate::ui::HelpMenuWidget;

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Check if chord has timed out
        app.check_chord_timeout();

        // Re-check the backend once the interval has passed
        app.poll_health(Instant::now());

        // Apply answers and health reports from worker threads
        app.apply_worker_events();

        // Update toast manager (remove expired)
        app.toast_manager.update();

        // Persist anything that changed
        app.flush_store();

        app.tick();

        // Draw UI
        terminal.draw(|f| draw_ui(f, app))?;

        // Handle events with timeout so answers show up promptly
        if poll(POLL_INTERVAL)? {
            match read()? {
                Event::Key(key) => match handle_key_event(app, key) {
                    KeyAction::Continue => {}
                    KeyAction::Quit => return Ok(()),
                },
                Event::Mouse(mouse) => {
                    handle_mouse_event(app, mouse);
                }
                Event::Paste(text) => app.paste(&text),
                _ => {}
            }
        }
    }
}

fn draw_ui(f: &mut Frame, app: &mut App) {
    let (sidebar_area, chat_area, help_area) =
        create_layout_with_help_config(f.area(), &app.config.layout);

    let spinner = app.spinner_frame();

    // Draw sidebar with processing indicators
    let sidebar = Sidebar::new(&app.conversations, app.focus == Focus::Sidebar, spinner);
    f.render_stateful_widget(sidebar, sidebar_area, &mut app.sidebar_state);

    let (header_area, messages_area, input_area) = split_chat_area(chat_area);
    draw_header(f, header_area, app);

    let chat_pane = ChatPane::new(app.conversations.active(), spinner);
    f.render_stateful_widget(chat_pane, messages_area, &mut app.chat_state);

    draw_input(f, input_area, app);
    app.input_area = Some(input_area);

    draw_help_bar(f, help_area, app);

    // Draw toasts (overlay on top of everything except modals)
    let toasts: Vec<_> = app.toast_manager.visible_toasts();
    if !toasts.is_empty() {
        ToastWidget::new(&toasts).render(f, f.area());
    }

    if app.help_menu_open {
        let area = HelpMenuWidget::calculate_area(f.area());
        f.render_widget(HelpMenuWidget::new(), area);
    }

    // Draw modal last (highest z-index)
    draw_modal(f, app);
}

fn draw_modal(f: &mut Frame, app: &App) {
    match &app.modal_state {
        ModalState::None => {}
        ModalState::Rename(state) => {
            let area = RenameModal::calculate_area(f.area());
            RenameModal::new(state).render(f, area);
        }
        ModalState::Source(state) => {
            let area = SourceModal::calculate_area(f.area());
            SourceModal::new(state).render(f, area);
        }
    }
}

/// Title of the active conversation plus backend state
fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let (title, count) = app
        .conversations
        .active()
        .map(|c| (c.title.as_str(), c.messages.len()))
        .unwrap_or(("", 0));

    let status_style = match app.backend_status {
        BackendStatus::Unknown => Style::default().fg(Color::DarkGray),
        BackendStatus::Healthy { .. } => Style::default().fg(Color::Green),
        BackendStatus::Degraded(_) => Style::default().fg(Color::Yellow),
        BackendStatus::Unreachable(_) => Style::default().fg(Color::Red),
    };
    let noun = if count == 1 { "message" } else { "messages" };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("· {count} {noun} "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("· {} ", app.backend_status.label()), status_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", app.config.backend_url),
                Style::default().fg(Color::DarkGray),
            )),
    );
    f.render_widget(header, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input && !app.modal_state.is_open();
    let waiting = app.conversations.active().is_some_and(|c| c.is_processing);

    let (title, border) = if waiting {
        (" Waiting for answer… ", Color::Yellow)
    } else if focused {
        (" Ask ", Color::Cyan)
    } else {
        (" Ask ", Color::DarkGray)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    app.input.render(f, area, block, focused);
}

fn draw_help_bar(f: &mut Frame, area: Rect, app: &App) {
    // Check for pending chord sequence
    if let Some(pending) = app.chord_state.pending_display() {
        let hint = match &app.chord_state {
            ChordState::DeletePending { .. } => {
                format!(" {pending} (press d again to delete, Esc to cancel)")
            }
            ChordState::ClearPending { .. } => {
                format!(" {pending} (press C again to clear, Esc to cancel)")
            }
            ChordState::None => String::new(),
        };
        let msg = Paragraph::new(Line::from(vec![
            Span::styled(
                " PENDING ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ),
            Span::raw(hint),
        ]))
        .style(Style::default().bg(Color::DarkGray));
        f.render_widget(msg, area);
        return;
    }

    let mut spans = vec![build_mode_indicator(app)];
    match app.focus {
        Focus::Sidebar => spans.extend(vec![
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("switch "),
            Span::styled(" i ", Style::default().fg(Color::Cyan)),
            Span::raw("ask "),
            Span::styled(" n ", Style::default().fg(Color::Cyan)),
            Span::raw("new "),
            Span::styled(" r ", Style::default().fg(Color::Cyan)),
            Span::raw("rename "),
            Span::styled(" dd ", Style::default().fg(Color::Cyan)),
            Span::raw("delete "),
            Span::styled(" s ", Style::default().fg(Color::Cyan)),
            Span::raw("sources "),
            Span::styled(" ? ", Style::default().fg(Color::Cyan)),
            Span::raw("help "),
            Span::styled(" q ", Style::default().fg(Color::Cyan)),
            Span::raw("quit"),
        ]),
        Focus::Input => spans.extend(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Cyan)),
            Span::raw("send "),
            Span::styled(" Esc ", Style::default().fg(Color::Cyan)),
            Span::raw("sidebar "),
            Span::styled(" PgUp/PgDn ", Style::default().fg(Color::Cyan)),
            Span::raw("scroll "),
            Span::styled(" C-u ", Style::default().fg(Color::Cyan)),
            Span::raw("clear line "),
            Span::styled(" C-c ", Style::default().fg(Color::Cyan)),
            Span::raw("quit"),
        ]),
    }

    let pending = app.pending_questions();
    if pending > 0 {
        spans.push(Span::styled(
            format!("  {pending} waiting"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(help, area);
}

/// Build the focus indicator span for the help bar
fn build_mode_indicator(app: &App) -> Span<'static> {
    match app.focus {
        Focus::Sidebar => Span::styled(
            " -- LIST -- ",
            Style::default().fg(Color::Black).bg(Color::Blue),
        ),
        Focus::Input => Span::styled(
            " -- ASK -- ",
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
    }
}
