//! The opt-in dialog component.
//!
//! [`OptinDialog`] owns the presentation state machine (idle → shown →
//! idle), builds the visual tree from resolved [`DialogOptions`], and
//! converts user interaction into subscription and snooze requests.
//! Every transition emits a cancelable [`signal`] that listeners may
//! veto. [`TriggerGate`] decides when to ask for a presentation.

mod controller;
mod gate;
mod options;
pub mod signal;
mod view;

pub use controller::OptinDialog;
pub use gate::TriggerGate;
pub use options::DialogOptions;

/// The dialog's three click targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Positive,
    Negative,
    Close,
}
