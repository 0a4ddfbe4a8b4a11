//! Multi-conversation chat state.
//!
//! This module provides:
//! - `ConversationManager` - Owns every chat thread and the active selection
//! - `Conversation` / `Message` - The thread and message records
//! - `ConversationStore` - JSON snapshot persistence for the manager

pub mod manager;
pub mod store;
pub mod types;

pub use manager::ConversationManager;
pub use store::ConversationStore;
pub use types::{
    derive_title, Conversation, ConversationId, Message, Role, SourceRef, DEFAULT_TITLE,
    TITLE_MAX_CHARS,
};
