use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

use crate::config::keys::{Key, KeyBinding};
use crate::dialog::PromptAction;

/// Actions available outside the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Suspend,
    ShowDialog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub suspend: KeyBinding,
    pub show_dialog: KeyBinding,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            suspend: Key::ctrl(KeyCode::Char('z')).into(),
            show_dialog: Key::new(KeyCode::Char('s')).into(),
        }
    }
}

/// Keyboard equivalents of the dialog's three click targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptKeybindings {
    pub positive: KeyBinding,
    pub negative: KeyBinding,
    pub close: KeyBinding,
}

impl Default for PromptKeybindings {
    fn default() -> Self {
        Self {
            positive: KeyBinding::of([Key::new(KeyCode::Enter), Key::new(KeyCode::Char('y'))]),
            negative: KeyBinding::of([Key::new(KeyCode::Char('l')), Key::new(KeyCode::Char('n'))]),
            close: Key::new(KeyCode::Esc).into(),
        }
    }
}

impl PromptKeybindings {
    /// Map a key event to a dialog action, if any binding matches.
    pub fn action_for(&self, event: &KeyEvent) -> Option<PromptAction> {
        if self.positive.matches(event) {
            Some(PromptAction::Positive)
        } else if self.negative.matches(event) {
            Some(PromptAction::Negative)
        } else if self.close.matches(event) {
            Some(PromptAction::Close)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeybindingsConfig {
    #[serde(default)]
    pub global: GlobalKeybindings,
    #[serde(default)]
    pub prompt: PromptKeybindings,
}

impl KeybindingsConfig {
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        match action {
            GlobalAction::Quit => self.global.quit.matches(event),
            GlobalAction::Suspend => self.global.suspend.matches(event),
            GlobalAction::ShowDialog => self.global.show_dialog.matches(event),
        }
    }
}
