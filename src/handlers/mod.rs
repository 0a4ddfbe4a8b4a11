//! Terminal input handling: keys and mouse events mapped onto App actions.

pub(crate) mod keyboard;
pub(crate) mod modal;
pub(crate) mod mouse;

/// Action returned from key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Continue,
    Quit,
}
