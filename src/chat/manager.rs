//! Conversation manager: owns every chat thread and the active selection.
//!
//! Every mutating operation returns `true` when it found its target and
//! changed state. An unknown ID is a no-op reporting `false`.

use chrono::Utc;

use super::types::{
    derive_title, generate_id, Conversation, ConversationId, Message, Role, SourceRef,
    DEFAULT_TITLE,
};

/// Manages all chat threads.
///
/// The collection is never empty and the active ID always names a
/// conversation in it.
#[derive(Debug, Clone)]
pub struct ConversationManager {
    /// Conversations in insertion order.
    conversations: Vec<Conversation>,
    /// ID of the active conversation.
    active_id: Option<ConversationId>,
}

impl ConversationManager {
    /// Create a manager seeded with one empty, active conversation.
    pub fn new() -> Self {
        let mut manager = Self {
            conversations: Vec::new(),
            active_id: None,
        };
        manager.create_conversation();
        manager
    }

    /// Rebuild a manager from persisted conversations.
    ///
    /// Processing flags are cleared since no answer outlives the process. An
    /// empty list is seeded with one conversation and an unknown active ID
    /// falls back to the last conversation.
    pub fn from_snapshot(
        conversations: Vec<Conversation>,
        active_id: Option<ConversationId>,
    ) -> Self {
        let mut manager = Self {
            conversations,
            active_id: None,
        };

        for conv in &mut manager.conversations {
            conv.is_processing = false;
        }

        if manager.conversations.is_empty() {
            manager.create_conversation();
            return manager;
        }

        match active_id {
            Some(id) if manager.get(&id).is_some() => manager.active_id = Some(id),
            _ => manager.select_fallback(),
        }
        manager
    }

    /// Create a new empty conversation, make it active and return its ID.
    pub fn create_conversation(&mut self) -> ConversationId {
        let mut id = generate_id();
        while self.get(&id).is_some() {
            id = generate_id();
        }

        self.conversations.push(Conversation::new(id.clone()));
        self.active_id = Some(id.clone());
        tracing::debug!(conversation = %id, "created conversation");
        id
    }

    /// Delete a conversation.
    ///
    /// When the active conversation is removed, the last remaining one becomes
    /// active; if none remain a fresh conversation replaces it.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.conversations.remove(index);
        tracing::debug!(conversation = %id, "deleted conversation");

        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
            self.select_fallback();
        }
        true
    }

    /// Make a conversation active. Unknown IDs are ignored.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    /// Rename a conversation. Titles that are blank after trimming are rejected.
    pub fn rename_conversation(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(conv) = self.get_mut(id) else {
            return false;
        };

        conv.title = title.to_string();
        conv.updated_at = Utc::now();
        true
    }

    /// Append a message to a conversation.
    ///
    /// The first user message of an empty conversation also sets its title,
    /// replacing any earlier rename.
    pub fn append_message(
        &mut self,
        id: &str,
        role: Role,
        content: impl Into<String>,
        sources: Option<Vec<SourceRef>>,
    ) -> bool {
        let Some(conv) = self.get_mut(id) else {
            return false;
        };

        let content = content.into();
        if role == Role::User && conv.messages.is_empty() {
            conv.title = derive_title(&content);
        }

        let now = Utc::now();
        conv.messages.push(Message {
            role,
            content,
            sources,
            timestamp: now,
        });
        conv.updated_at = now;
        true
    }

    /// Remove all messages and reset the title to the placeholder.
    pub fn clear_messages(&mut self, id: &str) -> bool {
        let Some(conv) = self.get_mut(id) else {
            return false;
        };

        conv.messages.clear();
        conv.title = DEFAULT_TITLE.to_string();
        conv.updated_at = Utc::now();
        true
    }

    /// Set whether an answer is outstanding for a conversation.
    pub fn set_processing(&mut self, id: &str, processing: bool) -> bool {
        let Some(conv) = self.get_mut(id) else {
            return false;
        };
        conv.is_processing = processing;
        true
    }

    /// The active conversation.
    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    /// ID of the active conversation.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Position of the active conversation in insertion order.
    pub fn active_index(&self) -> Option<usize> {
        self.active_id.as_deref().and_then(|id| self.index_of(id))
    }

    /// Look up a conversation by ID.
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// All conversations in insertion order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Number of conversations.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Never true after construction.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.id == id)
    }

    /// Activate the last conversation, creating one if the collection is empty.
    fn select_fallback(&mut self) {
        match self.conversations.last() {
            Some(last) => self.active_id = Some(last.id.clone()),
            None => {
                self.create_conversation();
            }
        }
    }
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_invariants(manager: &ConversationManager) {
        assert!(!manager.is_empty(), "collection must never be empty");
        let active = manager.active_id().expect("an active conversation");
        assert!(
            manager.get(active).is_some(),
            "active id {active} must name a conversation"
        );
    }

    #[test]
    fn new_manager_has_one_empty_active_conversation() {
        let manager = ConversationManager::new();

        assert_eq!(manager.len(), 1);
        let active = manager.active().unwrap();
        assert!(active.messages.is_empty());
        assert_eq!(active.title, DEFAULT_TITLE);
        assert!(!active.is_processing);
        assert_eq!(manager.active_index(), Some(0));
    }

    #[test]
    fn create_conversation_adds_and_activates_new_empty_conversation() {
        let mut manager = ConversationManager::new();
        let first = manager.active_id().unwrap().to_string();

        let second = manager.create_conversation();

        assert_eq!(manager.len(), 2);
        assert_ne!(first, second);
        assert_eq!(manager.active_id(), Some(second.as_str()));
        assert!(manager.active().unwrap().messages.is_empty());
        assert_eq!(manager.active_index(), Some(1));
    }

    #[test]
    fn first_user_message_derives_truncated_title() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();

        manager.append_message(
            &id,
            Role::User,
            "What is the refund policy for orders placed online",
            None,
        );

        assert_eq!(
            manager.get(&id).unwrap().title,
            "What is the refund policy for ..."
        );
    }

    #[test]
    fn short_first_user_message_becomes_title_verbatim() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();

        manager.append_message(&id, Role::User, "Hi", None);

        assert_eq!(manager.get(&id).unwrap().title, "Hi");
    }

    #[test]
    fn later_messages_do_not_change_title() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();

        manager.append_message(&id, Role::User, "Hi", None);
        manager.append_message(&id, Role::Assistant, "Hello!", None);
        manager.append_message(&id, Role::User, "Another question", None);

        assert_eq!(manager.get(&id).unwrap().title, "Hi");
        assert_eq!(manager.get(&id).unwrap().messages.len(), 3);
    }

    #[test]
    fn first_assistant_message_does_not_derive_title() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();

        manager.append_message(&id, Role::Assistant, "Welcome", None);
        manager.append_message(&id, Role::User, "Hi", None);

        assert_eq!(manager.get(&id).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn rename_before_first_message_is_overwritten_by_auto_title() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();

        assert!(manager.rename_conversation(&id, "Refunds"));
        manager.append_message(&id, Role::User, "Hi", None);

        assert_eq!(manager.get(&id).unwrap().title, "Hi");
    }

    #[test]
    fn rename_after_first_message_sticks() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();

        manager.append_message(&id, Role::User, "Hi", None);
        assert!(manager.rename_conversation(&id, "  Greetings  "));
        manager.append_message(&id, Role::User, "Again", None);

        assert_eq!(manager.get(&id).unwrap().title, "Greetings");
    }

    #[test]
    fn rename_with_blank_title_is_rejected() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();
        let before = manager.get(&id).unwrap().clone();

        assert!(!manager.rename_conversation(&id, "   "));
        assert!(!manager.rename_conversation(&id, ""));

        assert_eq!(manager.get(&id).unwrap(), &before);
    }

    #[test]
    fn rename_refreshes_updated_at() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();
        let before = manager.get(&id).unwrap().updated_at;

        manager.rename_conversation(&id, "Renamed");

        assert!(manager.get(&id).unwrap().updated_at >= before);
    }

    #[test]
    fn deleting_active_conversation_falls_back_to_last_remaining() {
        let mut manager = ConversationManager::new();
        let a = manager.active_id().unwrap().to_string();
        let b = manager.create_conversation();

        assert!(manager.delete_conversation(&b));

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.active_id(), Some(a.as_str()));
        assert!(manager.get(&b).is_none());
    }

    #[test]
    fn fallback_prefers_last_inserted_not_first() {
        let mut manager = ConversationManager::new();
        let _a = manager.active_id().unwrap().to_string();
        let b = manager.create_conversation();
        let c = manager.create_conversation();
        manager.set_active(&b);

        manager.delete_conversation(&b);

        assert_eq!(manager.active_id(), Some(c.as_str()));
    }

    #[test]
    fn deleting_inactive_conversation_keeps_selection() {
        let mut manager = ConversationManager::new();
        let a = manager.active_id().unwrap().to_string();
        let b = manager.create_conversation();

        assert!(manager.delete_conversation(&a));

        assert_eq!(manager.active_id(), Some(b.as_str()));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn deleting_only_conversation_synthesizes_replacement() {
        let mut manager = ConversationManager::new();
        let only = manager.active_id().unwrap().to_string();
        manager.append_message(&only, Role::User, "Hi", None);

        assert!(manager.delete_conversation(&only));

        assert_eq!(manager.len(), 1);
        let replacement = manager.active().unwrap();
        assert_ne!(replacement.id, only);
        assert!(replacement.messages.is_empty());
        assert_eq!(replacement.title, DEFAULT_TITLE);
    }

    #[test]
    fn deleting_unknown_id_is_noop() {
        let mut manager = ConversationManager::new();
        let before: Vec<_> = manager.conversations().to_vec();

        assert!(!manager.delete_conversation("chat_missing"));

        assert_eq!(manager.conversations(), before.as_slice());
    }

    #[test]
    fn set_active_ignores_unknown_ids() {
        let mut manager = ConversationManager::new();
        let a = manager.active_id().unwrap().to_string();

        assert!(!manager.set_active("chat_missing"));

        assert_eq!(manager.active_id(), Some(a.as_str()));
    }

    #[test]
    fn set_active_twice_is_idempotent() {
        let mut manager = ConversationManager::new();
        let a = manager.active_id().unwrap().to_string();
        manager.create_conversation();

        manager.set_active(&a);
        let once = (manager.active_id().map(str::to_string), manager.conversations().to_vec());
        manager.set_active(&a);
        let twice = (manager.active_id().map(str::to_string), manager.conversations().to_vec());

        assert_eq!(once, twice);
    }

    #[test]
    fn operations_on_unknown_id_change_nothing() {
        let mut manager = ConversationManager::new();
        let before: Vec<_> = manager.conversations().to_vec();

        assert!(!manager.rename_conversation("nope", "Title"));
        assert!(!manager.append_message("nope", Role::User, "Hi", None));
        assert!(!manager.clear_messages("nope"));
        assert!(!manager.set_processing("nope", true));

        assert_eq!(manager.conversations(), before.as_slice());
        assert!(manager.get("nope").is_none());
    }

    #[test]
    fn clear_messages_empties_thread_and_resets_title() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();
        manager.append_message(&id, Role::User, "Hi", None);
        manager.append_message(&id, Role::Assistant, "Hello", None);

        assert!(manager.clear_messages(&id));

        let conv = manager.get(&id).unwrap();
        assert!(conv.messages.is_empty());
        assert_eq!(conv.title, DEFAULT_TITLE);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn first_message_after_clear_derives_title_again() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();
        manager.append_message(&id, Role::User, "Hi", None);
        manager.clear_messages(&id);

        manager.append_message(&id, Role::User, "Shipping times", None);

        assert_eq!(manager.get(&id).unwrap().title, "Shipping times");
    }

    #[test]
    fn processing_flags_are_independent_per_conversation() {
        let mut manager = ConversationManager::new();
        let a = manager.active_id().unwrap().to_string();
        let b = manager.create_conversation();

        manager.set_processing(&a, true);
        manager.set_processing(&b, true);
        assert!(manager.get(&a).unwrap().is_processing);
        assert!(manager.get(&b).unwrap().is_processing);

        manager.set_processing(&a, false);
        assert!(!manager.get(&a).unwrap().is_processing);
        assert!(manager.get(&b).unwrap().is_processing);
    }

    #[test]
    fn set_processing_leaves_other_fields_untouched() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();
        let before = manager.get(&id).unwrap().clone();

        manager.set_processing(&id, true);

        let after = manager.get(&id).unwrap();
        assert_eq!(after.updated_at, before.updated_at);
        assert_eq!(after.title, before.title);
        assert_eq!(after.messages, before.messages);
    }

    #[test]
    fn append_message_keeps_sources_and_order() {
        let mut manager = ConversationManager::new();
        let id = manager.active_id().unwrap().to_string();
        let sources = vec![SourceRef(json!({"filename": "faq.md"}))];

        manager.append_message(&id, Role::User, "Q", None);
        manager.append_message(&id, Role::Assistant, "A", Some(sources.clone()));

        let conv = manager.get(&id).unwrap();
        assert_eq!(conv.messages[0].content, "Q");
        assert_eq!(conv.messages[1].content, "A");
        assert_eq!(conv.messages[1].sources.as_ref(), Some(&sources));
        assert!(conv.messages[1].timestamp >= conv.messages[0].timestamp);
    }

    #[test]
    fn invariants_hold_across_mixed_operation_sequence() {
        let mut manager = ConversationManager::new();

        for step in 0..60 {
            let ids: Vec<String> = manager
                .conversations()
                .iter()
                .map(|c| c.id.clone())
                .collect();
            let target = ids[step % ids.len()].clone();

            match step % 9 {
                0 => {
                    manager.create_conversation();
                }
                1 | 4 => {
                    let before = manager.get(&target).unwrap().messages.len();
                    manager.append_message(&target, Role::User, format!("question {step}"), None);
                    assert_eq!(manager.get(&target).unwrap().messages.len(), before + 1);
                }
                2 => {
                    manager.set_active(&target);
                }
                3 => {
                    manager.delete_conversation(&target);
                }
                5 => {
                    manager.rename_conversation(&target, &format!("title {step}"));
                }
                6 => {
                    assert!(manager.clear_messages(&target));
                    let cleared = manager.get(&target).unwrap();
                    assert!(cleared.messages.is_empty());
                    assert_eq!(cleared.title, DEFAULT_TITLE);
                }
                7 => {
                    let processing = step % 2 == 0;
                    assert!(manager.set_processing(&target, processing));
                    assert_eq!(manager.get(&target).unwrap().is_processing, processing);
                }
                _ => {
                    let active = manager.active_id().unwrap().to_string();
                    manager.delete_conversation(&active);
                }
            }

            assert_invariants(&manager);
        }
    }

    #[test]
    fn deleting_everything_one_by_one_always_leaves_one_conversation() {
        let mut manager = ConversationManager::new();
        for _ in 0..4 {
            manager.create_conversation();
        }

        for _ in 0..10 {
            let id = manager.conversations()[0].id.clone();
            manager.delete_conversation(&id);
            assert_invariants(&manager);
        }
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn from_snapshot_restores_selection_and_clears_processing() {
        let mut original = ConversationManager::new();
        let a = original.active_id().unwrap().to_string();
        let b = original.create_conversation();
        original.set_active(&a);
        original.set_processing(&b, true);

        let restored = ConversationManager::from_snapshot(
            original.conversations().to_vec(),
            Some(a.clone()),
        );

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.active_id(), Some(a.as_str()));
        assert!(!restored.get(&b).unwrap().is_processing);
    }

    #[test]
    fn from_snapshot_with_unknown_active_selects_last() {
        let mut original = ConversationManager::new();
        let b = original.create_conversation();

        let restored = ConversationManager::from_snapshot(
            original.conversations().to_vec(),
            Some("chat_gone".to_string()),
        );

        assert_eq!(restored.active_id(), Some(b.as_str()));
    }

    #[test]
    fn from_empty_snapshot_seeds_one_conversation() {
        let restored = ConversationManager::from_snapshot(Vec::new(), None);
        assert_eq!(restored.len(), 1);
        assert_invariants(&restored);
    }
}
