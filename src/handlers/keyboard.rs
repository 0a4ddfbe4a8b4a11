use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, ChordState, Focus};
use crate::ui::input_line::InputKeyResult;

use super::modal::forward_key_to_modal;
use super::KeyAction;

pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    // Windows reports releases as separate events
    if key.kind == KeyEventKind::Release {
        return KeyAction::Continue;
    }

    // 1. True global keybindings
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return KeyAction::Quit;
    }

    // 2. Modal gets every key while open
    if app.modal_state.is_open() {
        forward_key_to_modal(app, key);
        return KeyAction::Continue;
    }

    // 3. Help menu swallows one key to close
    if app.help_menu_open {
        app.help_menu_open = false;
        if key.code == KeyCode::Char('q') {
            return KeyAction::Quit;
        }
        return KeyAction::Continue;
    }

    match app.focus {
        Focus::Input => {
            handle_input_key(app, key);
            KeyAction::Continue
        }
        Focus::Sidebar => handle_sidebar_key(app, key),
    }
}

/// Keys while typing a question
fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.set_focus(Focus::Sidebar),
        KeyCode::PageUp => app.page_chat_up(),
        KeyCode::PageDown => app.page_chat_down(),
        _ => match app.input.handle_key(key) {
            InputKeyResult::Submit => {
                let question = app.input.text().to_string();
                if app.submit_question(&question) {
                    app.input.clear();
                }
            }
            InputKeyResult::Cancel => app.set_focus(Focus::Sidebar),
            InputKeyResult::Changed | InputKeyResult::Continue => {}
        },
    }
}

/// Keys while the conversation list has focus
fn handle_sidebar_key(app: &mut App, key: KeyEvent) -> KeyAction {
    // Handle chord sequences first
    match std::mem::take(&mut app.chord_state) {
        ChordState::None => {}
        ChordState::DeletePending { .. } => {
            if key.code == KeyCode::Char('d') && key.modifiers == KeyModifiers::NONE {
                app.delete_active();
                return KeyAction::Continue;
            }
        }
        ChordState::ClearPending { .. } => {
            if key.code == KeyCode::Char('C') {
                app.clear_active();
                return KeyAction::Continue;
            }
        }
    }
    // Any other key cancels the chord and is handled normally
    if key.code == KeyCode::Esc {
        return KeyAction::Continue;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return KeyAction::Quit,
        (KeyCode::Char('j') | KeyCode::Down, _) => app.navigate_down(),
        (KeyCode::Char('k') | KeyCode::Up, _) => app.navigate_up(),
        (KeyCode::Char('g') | KeyCode::Home, _) => app.jump_to_first(),
        (KeyCode::Char('G'), _) => app.jump_to_last(),
        (KeyCode::Char('n'), KeyModifiers::NONE) => app.new_conversation(),
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            app.chord_state = ChordState::DeletePending {
                started_at: Instant::now(),
            };
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => app.open_rename(),
        (KeyCode::Char('C'), _) => {
            app.chord_state = ChordState::ClearPending {
                started_at: Instant::now(),
            };
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => app.open_sources(),
        (KeyCode::Char('y'), KeyModifiers::NONE) => app.copy_last_answer(),
        (KeyCode::Char('p'), KeyModifiers::NONE) => app.toggle_sidebar_position(),
        (KeyCode::Char('h'), KeyModifiers::NONE) => {
            app.refresh_health();
            app.toast_info("Checking backend…");
        }
        (KeyCode::Char('?'), _) => app.help_menu_open = true,
        (KeyCode::Char('i') | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Tab, _) => {
            app.set_focus(Focus::Input);
        }
        (KeyCode::PageUp, _) => app.page_chat_up(),
        (KeyCode::PageDown, _) => app.page_chat_down(),
        (KeyCode::End, _) => app.jump_to_latest(),
        _ => {}
    }
    KeyAction::Continue
}
