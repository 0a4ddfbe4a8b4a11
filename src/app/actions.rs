//! User-facing actions on App (asking, conversation management, clipboard, etc.).

use crate::chat::Role;
use crate::ui::input_line::InputKeyResult;
use crate::worker::WorkerEvent;

use super::*;

impl App {
    // =========================================================================
    // Asking
    // =========================================================================

    /// Send `question` from the active conversation to the backend.
    ///
    /// Returns false when the question is blank or the conversation is still
    /// waiting for an earlier answer.
    pub fn submit_question(&mut self, question: &str) -> bool {
        let question = question.trim();
        if question.is_empty() {
            return false;
        }

        let Some(conversation) = self.conversations.active() else {
            return false;
        };
        if conversation.is_processing {
            self.toast_warning("Still waiting for the previous answer");
            return false;
        }
        let id = conversation.id.clone();

        self.conversations.set_processing(&id, true);
        self.conversations
            .append_message(&id, Role::User, question, None);
        tracing::info!(conversation = %id, chars = question.len(), "question submitted");
        self.dispatcher.dispatch(id, question.to_string());

        self.chat_state.reset();
        self.mark_dirty();
        true
    }

    /// Apply every worker result that arrived since the last tick
    pub fn apply_worker_events(&mut self) {
        for event in self.dispatcher.drain() {
            self.apply_worker_event(event);
        }
    }

    pub(crate) fn apply_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Answered {
                conversation_id,
                answer,
            } => {
                let sources = (!answer.sources.is_empty()).then_some(answer.sources);
                self.finish_question(&conversation_id, answer.answer, sources);
            }
            WorkerEvent::Failed {
                conversation_id,
                error,
            } => {
                self.finish_question(&conversation_id, format!("Error: {error}"), None);
            }
            WorkerEvent::Health(report) => {
                let status = BackendStatus::from_report(report);
                // Periodic checks only speak up when the state changes
                let changed = std::mem::discriminant(&status)
                    != std::mem::discriminant(&self.backend_status);
                match &status {
                    BackendStatus::Unreachable(message) => {
                        tracing::warn!(error = %message, "backend health check failed");
                        if changed {
                            self.toast_error("Backend unreachable");
                        }
                    }
                    BackendStatus::Degraded(detail) => {
                        tracing::warn!(detail = %detail, "backend degraded");
                        if changed {
                            self.toast_warning("Backend is degraded");
                        }
                    }
                    BackendStatus::Healthy { documents } => {
                        tracing::debug!(documents, "backend healthy");
                    }
                    BackendStatus::Unknown => {}
                }
                self.backend_status = status;
            }
        }
    }

    fn finish_question(
        &mut self,
        conversation_id: &str,
        content: String,
        sources: Option<Vec<crate::chat::SourceRef>>,
    ) {
        if !self
            .conversations
            .append_message(conversation_id, Role::Assistant, content, sources)
        {
            tracing::debug!(conversation = %conversation_id, "dropping answer for deleted conversation");
            return;
        }
        self.conversations.set_processing(conversation_id, false);
        self.mark_dirty();

        if self.conversations.active_id() != Some(conversation_id) {
            if let Some(conversation) = self.conversations.get(conversation_id) {
                let title = conversation.title.clone();
                self.toast_info(format!("Answer ready in \"{title}\""));
            }
        }
    }

    /// Ask the backend for a fresh health report
    pub fn refresh_health(&mut self) {
        self.last_health_check = Some(Instant::now());
        self.dispatcher.check_health();
    }

    /// Start a health check when the configured interval has passed since the last one
    pub fn poll_health(&mut self, now: Instant) -> bool {
        let due = match self.last_health_check {
            Some(last) => {
                now.saturating_duration_since(last) >= self.config.health_check_interval()
            }
            None => true,
        };
        if due {
            tracing::trace!("periodic health check");
            self.refresh_health();
        }
        due
    }

    // =========================================================================
    // Conversation Management
    // =========================================================================

    /// Start a new conversation and move focus to the question box
    pub fn new_conversation(&mut self) {
        self.conversations.create_conversation();
        self.chat_state.reset();
        self.set_focus(Focus::Input);
        self.mark_dirty();
    }

    /// Delete the active conversation. The last one is never deleted from the UI.
    pub fn delete_active(&mut self) -> bool {
        if self.conversations.len() <= 1 {
            self.toast_warning("Cannot delete the last conversation");
            return false;
        }
        let Some(id) = self.conversations.active_id().map(str::to_string) else {
            return false;
        };

        if !self.conversations.delete_conversation(&id) {
            return false;
        }
        tracing::info!(conversation = %id, "conversation deleted");
        self.chat_state.reset();
        self.toast_info("Conversation deleted");
        self.mark_dirty();
        true
    }

    /// Open the rename modal for the active conversation
    pub fn open_rename(&mut self) {
        if let Some(conversation) = self.conversations.active() {
            let state = RenameModalState::new(conversation.id.clone(), &conversation.title);
            self.modal_state = ModalState::Rename(Box::new(state));
        }
    }

    /// Apply a title chosen in the rename modal and close it
    pub fn confirm_rename(&mut self, conversation_id: &str, title: &str) {
        self.close_modal();
        if self.conversations.rename_conversation(conversation_id, title) {
            self.toast_success("Conversation renamed");
            self.mark_dirty();
        } else {
            self.toast_warning("Conversation no longer exists");
        }
    }

    /// Open the source viewer for the newest answer that cited sources
    pub fn open_sources(&mut self) {
        let state = self
            .conversations
            .active()
            .and_then(|c| c.last_answer())
            .and_then(|m| m.sources.as_deref())
            .and_then(SourceModalState::new);

        match state {
            Some(state) => self.modal_state = ModalState::Source(Box::new(state)),
            None => self.toast_warning("No sources for the last answer"),
        }
    }

    /// Remove every message from the active conversation
    pub fn clear_active(&mut self) {
        let Some(conversation) = self.conversations.active() else {
            return;
        };
        if conversation.is_processing {
            self.toast_warning("Wait for the answer before clearing");
            return;
        }
        if conversation.messages.is_empty() {
            return;
        }
        let id = conversation.id.clone();

        self.conversations.clear_messages(&id);
        self.chat_state.reset();
        self.toast_info("Conversation cleared");
        self.mark_dirty();
    }

    // =========================================================================
    // Clipboard Methods
    // =========================================================================

    /// Copy the newest answer of the active conversation to the clipboard
    pub fn copy_last_answer(&mut self) {
        let Some(answer) = self
            .conversations
            .active()
            .and_then(|c| c.last_answer())
            .map(|m| m.content.clone())
        else {
            self.toast_warning("No answer to copy");
            return;
        };

        // Copy to clipboard using arboard
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            if clipboard.set_text(&answer).is_ok() {
                let chars = answer.chars().count();
                self.toast_success(format!("Copied answer ({chars} chars)"));
            } else {
                self.toast_error("Failed to copy");
            }
        } else {
            self.toast_error("Clipboard unavailable");
        }
    }

    /// Insert pasted text into whichever text field has focus
    pub fn paste(&mut self, text: &str) {
        match &mut self.modal_state {
            ModalState::Rename(state) => {
                if state.input.insert_paste(text) == InputKeyResult::Changed {
                    state.error_message = None;
                }
            }
            ModalState::Source(_) => {}
            ModalState::None => {
                if self.focus == Focus::Input {
                    self.input.insert_paste(text);
                }
            }
        }
    }

    // =========================================================================
    // Layout Methods
    // =========================================================================

    /// Move the sidebar to the other side and remember the choice
    pub fn toggle_sidebar_position(&mut self) {
        self.config.layout.sidebar_position = self.config.layout.sidebar_position.toggle();

        // Only the layout is written back; runtime overrides stay out of the file
        let mut on_disk = Config::load().unwrap_or_default();
        on_disk.layout = self.config.layout.clone();
        if let Err(e) = on_disk.save() {
            tracing::warn!(error = %e, "failed to save config");
            self.toast_error("Failed to save layout");
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save conversations if anything changed since the last save
    pub fn flush_store(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.conversations) {
            tracing::warn!(error = %format!("{e:#}"), "failed to save conversations");
            self.toast_error("Failed to save conversations");
        }
    }

    /// Save conversations unconditionally (used on shutdown)
    pub fn save_now(&mut self) -> anyhow::Result<()> {
        self.dirty = false;
        match &self.store {
            Some(store) => store.save(&self.conversations),
            None => Ok(()),
        }
    }

    /// Show an info toast
    pub fn toast_info(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Info);
    }

    /// Show a success toast
    pub fn toast_success(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Success);
    }

    /// Show a warning toast
    pub fn toast_warning(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Warning);
    }

    /// Show an error toast
    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Error);
    }
}
