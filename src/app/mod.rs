//! Application state for ragchat.

mod actions;
mod navigation;
mod state;

use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::api::QueryClient;
use crate::chat::{ConversationManager, ConversationStore};
use crate::config::Config;
use crate::ui::chat_pane::ChatPaneState;
use crate::ui::input_line::InputLine;
use crate::ui::modal::{RenameModalState, SourceModalState};
use crate::ui::sidebar::SidebarState;
use crate::ui::toast::{ToastManager, ToastType};
use crate::worker::QueryDispatcher;

// Re-export all public types from submodules
pub use state::{BackendStatus, ChordState, Focus};

/// Loop ticks per spinner frame
const TICKS_PER_SPINNER_FRAME: usize = 4;

/// Modal dialog state
pub enum ModalState {
    /// No modal is open
    None,
    /// Rename modal is open
    Rename(Box<RenameModalState>),
    /// Source viewer is open
    Source(Box<SourceModalState>),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::None)
    }
}

/// Application state
pub struct App {
    /// All conversations and the active selection
    pub conversations: ConversationManager,
    /// Where conversations are saved; `None` keeps them in memory only
    store: Option<ConversationStore>,
    /// Background question runner
    dispatcher: QueryDispatcher,
    /// Application configuration (backend, layout, etc.)
    pub config: Config,
    /// Sidebar state
    pub sidebar_state: SidebarState,
    /// Transcript scroll state
    pub chat_state: ChatPaneState,
    /// Question box area from the last render, used for mouse hit testing
    pub input_area: Option<Rect>,
    /// Current focus
    pub focus: Focus,
    /// Question being typed
    pub input: InputLine,
    /// Current modal state
    pub modal_state: ModalState,
    /// State for tracking chord key sequences (e.g., "dd" to delete)
    pub chord_state: ChordState,
    /// Toast notification manager
    pub toast_manager: ToastManager,
    /// Last health report from the backend
    pub backend_status: BackendStatus,
    /// Whether the help menu overlay is open (toggled by '?')
    pub help_menu_open: bool,
    /// When the last health check was sent
    last_health_check: Option<Instant>,
    /// Event loop iterations, drives animations
    tick: usize,
    /// Conversations changed since the last save
    dirty: bool,
}

impl App {
    /// Create a new application instance around restored conversations
    pub fn new(
        conversations: ConversationManager,
        store: Option<ConversationStore>,
        client: Arc<dyn QueryClient>,
        config: Config,
    ) -> Self {
        Self {
            conversations,
            store,
            dispatcher: QueryDispatcher::new(client),
            config,
            sidebar_state: SidebarState::new(),
            chat_state: ChatPaneState::default(),
            input_area: None,
            focus: Focus::Sidebar,
            input: InputLine::new(),
            modal_state: ModalState::None,
            chord_state: ChordState::None,
            toast_manager: ToastManager::new(),
            backend_status: BackendStatus::Unknown,
            help_menu_open: false,
            last_health_check: None,
            tick: 0,
            dirty: false,
        }
    }

    /// Set focus directly to a specific pane
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Check if chord has timed out and reset if so
    pub fn check_chord_timeout(&mut self) {
        if self.chord_state.is_expired() {
            self.chord_state = ChordState::None;
        }
    }

    /// Advance animations by one loop iteration
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Current frame index for spinners
    pub fn spinner_frame(&self) -> usize {
        self.tick / TICKS_PER_SPINNER_FRAME
    }

    /// Questions still waiting for an answer
    pub fn pending_questions(&self) -> usize {
        self.dispatcher.in_flight()
    }

    pub fn close_modal(&mut self) {
        self.modal_state = ModalState::None;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
