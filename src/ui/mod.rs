//! Terminal UI components: sidebar, chat pane, input line, modals, and widgets.

pub mod chat_pane;
pub mod help_menu;
pub mod input_line;
pub mod layout;
pub mod modal;
pub mod sidebar;
pub mod toast;
pub mod toast_widget;

pub use chat_pane::{ChatPane, ChatPaneState};
pub use help_menu::HelpMenuWidget;
pub use input_line::{InputKeyResult, InputLine};
pub use toast::{Toast, ToastManager, ToastType};
pub use toast_widget::ToastWidget;
