//! Navigation menu visibility.
//!
//! The state lives in the document, not in this module: the menu is hidden
//! exactly when the root element carries [`MENU_HIDDEN_CLASS`].

use crate::dom::page::MENU_HIDDEN_CLASS;
use crate::dom::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Shown,
    Hidden,
}

impl MenuState {
    pub fn flipped(self) -> Self {
        match self {
            MenuState::Shown => MenuState::Hidden,
            MenuState::Hidden => MenuState::Shown,
        }
    }
}

/// Reads the current state from the root marker.
pub fn state<D: Document + ?Sized>(doc: &D) -> MenuState {
    if doc.has_class(doc.root(), MENU_HIDDEN_CLASS) {
        MenuState::Hidden
    } else {
        MenuState::Shown
    }
}

/// Flips the menu and returns the new state.
pub fn toggle<D: Document + ?Sized>(doc: &mut D) -> MenuState {
    let root = doc.root();
    let hidden = doc.toggle_class(root, MENU_HIDDEN_CLASS);
    let new_state = if hidden {
        MenuState::Hidden
    } else {
        MenuState::Shown
    };
    tracing::debug!(state = ?new_state, "Menu toggled");
    new_state
}

/// Hides the menu regardless of its current state.
pub fn hide<D: Document + ?Sized>(doc: &mut D) {
    let root = doc.root();
    doc.add_class(root, MENU_HIDDEN_CLASS);
}
