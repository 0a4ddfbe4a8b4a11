use crossterm::event::KeyEvent;

use crate::app::{App, ModalState};
use crate::ui::modal::ModalKeyResult;

/// Forward a key event to the currently open modal
pub(crate) fn forward_key_to_modal(app: &mut App, key: KeyEvent) {
    let result = match &mut app.modal_state {
        ModalState::None => return,
        ModalState::Rename(state) => state.handle_key(key),
        ModalState::Source(state) => state.handle_key(key),
    };

    match result {
        ModalKeyResult::Continue => {}
        ModalKeyResult::Close => {
            app.close_modal();
        }
        ModalKeyResult::Renamed {
            conversation_id,
            title,
        } => {
            app.confirm_rename(&conversation_id, &title);
        }
    }
}
