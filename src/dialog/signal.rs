//! Cancelable lifecycle signals.
//!
//! Each dialog transition emits a signal to the listeners registered
//! for its name; any listener may veto it, which fully prevents the
//! transition. This is the terminal rendition of the cancelable DOM
//! events the web version dispatches. The names are part of the public
//! contract — external listeners key off them — and must stay stable.

use std::collections::HashMap;

use crate::dialog::PromptAction;

pub const SHOW: &str = "optin-prompt.show";
pub const HIDE: &str = "optin-prompt.hide";
pub const POSITIVE_CLICK: &str = "optin-prompt.positive-click";
pub const NEGATIVE_CLICK: &str = "optin-prompt.negative-click";
pub const CLOSE_CLICK: &str = "optin-prompt.close-click";

/// A lifecycle notification delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub name: &'static str,
    /// The click target for the three click signals; `None` for
    /// show/hide.
    pub action: Option<PromptAction>,
}

impl Signal {
    pub const fn named(name: &'static str) -> Self {
        Self { name, action: None }
    }

    pub const fn click(name: &'static str, action: PromptAction) -> Self {
        Self {
            name,
            action: Some(action),
        }
    }
}

/// A listener's verdict on a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Proceed,
    Veto,
}

type Listener = Box<dyn FnMut(&Signal) -> Reaction + Send>;

/// Per-name listener lists with veto semantics.
///
/// All listeners for a name run on every emission, even after one of
/// them vetoes; the emission reports a veto if any listener vetoed.
#[derive(Default)]
pub struct SignalHub {
    listeners: HashMap<&'static str, Vec<Listener>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        name: &'static str,
        listener: impl FnMut(&Signal) -> Reaction + Send + 'static,
    ) {
        self.listeners
            .entry(name)
            .or_default()
            .push(Box::new(listener));
    }

    /// Emit a signal. Returns `false` when any listener vetoed it.
    pub fn emit(&mut self, signal: &Signal) -> bool {
        let Some(listeners) = self.listeners.get_mut(signal.name) else {
            return true;
        };
        let mut allowed = true;
        for listener in listeners {
            if listener(signal) == Reaction::Veto {
                allowed = false;
            }
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_emit_without_listeners_proceeds() {
        let mut hub = SignalHub::new();
        assert!(hub.emit(&Signal::named(SHOW)));
    }

    #[test]
    fn test_single_veto_cancels() {
        let mut hub = SignalHub::new();
        hub.subscribe(SHOW, |_| Reaction::Proceed);
        hub.subscribe(SHOW, |_| Reaction::Veto);
        assert!(!hub.emit(&Signal::named(SHOW)));
    }

    #[test]
    fn test_all_listeners_run_despite_veto() {
        let mut hub = SignalHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            hub.subscribe(HIDE, move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                Reaction::Veto
            });
        }
        assert!(!hub.emit(&Signal::named(HIDE)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_names_are_scoped_per_signal() {
        let mut hub = SignalHub::new();
        hub.subscribe(NEGATIVE_CLICK, |_| Reaction::Veto);
        assert!(hub.emit(&Signal::click(POSITIVE_CLICK, PromptAction::Positive)));
        assert!(!hub.emit(&Signal::click(NEGATIVE_CLICK, PromptAction::Negative)));
    }

    #[test]
    fn test_click_signal_carries_action() {
        let mut hub = SignalHub::new();
        hub.subscribe(CLOSE_CLICK, |signal| {
            assert_eq!(signal.action, Some(PromptAction::Close));
            Reaction::Proceed
        });
        assert!(hub.emit(&Signal::click(CLOSE_CLICK, PromptAction::Close)));
    }
}
