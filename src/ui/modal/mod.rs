//! Modal dialog components for the TUI.

pub mod rename;
pub mod source;

pub use rename::{RenameModal, RenameModalState};
pub use source::{SourceModal, SourceModalState};

use crate::chat::ConversationId;

/// What a modal wants the app to do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKeyResult {
    /// Keep the modal open
    Continue,
    /// Dismiss without changes
    Close,
    /// Apply a new title to a conversation
    Renamed {
        conversation_id: ConversationId,
        title: String,
    },
}
