use std::sync::Arc;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::{debug, error, warn};

use crate::Theme;
use crate::config::{PromptKeybindings, SnoozeDirective};
use crate::dialog::signal::{self, Reaction, Signal, SignalHub};
use crate::dialog::view::{DialogTree, MountedDialog};
use crate::dialog::{DialogOptions, PromptAction};
use crate::host::{
    HostServices, SubscriptionService, SubscriptionState, SubscriptionStateSource, TriggerService,
};

const STYLESHEET: &str = "optin-prompt.css";

/// The opt-in dialog controller.
///
/// Owns the idle → shown → idle state machine: at most one dialog tree
/// is mounted at any time, transitions only happen through uncanceled
/// lifecycle signals, and user actions turn into fire-and-forget host
/// requests. The controller never awaits its side effects; failures
/// surface through logging only.
pub struct OptinDialog {
    options: DialogOptions,
    keys: PromptKeybindings,
    signals: SignalHub,
    triggers: Arc<dyn TriggerService>,
    subscriptions: Arc<dyn SubscriptionService>,
    subscription_state: Option<Arc<dyn SubscriptionStateSource>>,
    presenting: bool,
    mounted: Option<MountedDialog>,
}

impl OptinDialog {
    pub fn new(options: DialogOptions, hosts: &HostServices, keys: PromptKeybindings) -> Self {
        hosts.assets.load_stylesheet(STYLESHEET);
        Self {
            options,
            keys,
            signals: SignalHub::new(),
            triggers: Arc::clone(&hosts.triggers),
            subscriptions: Arc::clone(&hosts.subscriptions),
            subscription_state: hosts.subscription_state.clone(),
            presenting: false,
            mounted: None,
        }
    }

    pub const fn options(&self) -> &DialogOptions {
        &self.options
    }

    /// True exactly while a dialog tree is mounted.
    pub const fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Register a listener for one of the [`signal`] names. Any
    /// listener may veto the transition the signal announces.
    pub fn on(
        &mut self,
        name: &'static str,
        listener: impl FnMut(&Signal) -> Reaction + Send + 'static,
    ) {
        self.signals.subscribe(name, listener);
    }

    /// Present the dialog.
    ///
    /// A no-op while a presentation is already in progress, when the
    /// host reports a state in which asking would be meaningless, or
    /// when a listener vetoes the show signal.
    pub fn show(&mut self) {
        if self.presenting {
            debug!("presentation already in progress");
            return;
        }

        if let Some(source) = &self.subscription_state {
            let state = source.subscription_state();
            if matches!(
                state,
                SubscriptionState::Subscribed
                    | SubscriptionState::Denied
                    | SubscriptionState::Unsupported
            ) {
                debug!(%state, "not presenting opt-in dialog");
                return;
            }
        }

        self.presenting = true;
        let tree = DialogTree::build(&self.options);
        if !self.signals.emit(&Signal::named(signal::SHOW)) {
            debug!("show vetoed by listener");
            self.presenting = false;
            return;
        }
        self.mounted = Some(MountedDialog::new(tree));
    }

    /// Dismiss the dialog. A no-op when nothing is mounted; vetoable
    /// through the hide signal, in which case the dialog stays up.
    pub fn hide_dialog(&mut self) {
        if self.mounted.is_none() {
            return;
        }
        if !self.signals.emit(&Signal::named(signal::HIDE)) {
            debug!("hide vetoed by listener");
            return;
        }
        self.mounted = None;
        self.presenting = false;
    }

    /// Route a key event. Consumes every key while the dialog is
    /// mounted.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.mounted.is_none() {
            return false;
        }
        if let Some(action) = self.keys.action_for(key) {
            self.handle_action(action);
        }
        true
    }

    /// Route a mouse event to the click target under the cursor.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return false;
        }
        let Some(mounted) = &self.mounted else {
            return false;
        };
        let action = mounted.hit_action(mouse.column, mouse.row);
        let inside = mounted.contains(mouse.column, mouse.row);
        if let Some(action) = action {
            self.handle_action(action);
            return true;
        }
        inside
    }

    /// The single generic click handler: emit the action's signal and,
    /// unless vetoed, perform its effect and dismiss.
    fn handle_action(&mut self, action: PromptAction) {
        if self.mounted.is_none() {
            return;
        }
        let name = signal_name(action);
        if !self.signals.emit(&Signal::click(name, action)) {
            debug!(signal = name, "click vetoed by listener");
            return;
        }

        match action {
            PromptAction::Positive => self.request_subscription(),
            PromptAction::Negative => self.request_snooze(self.options.negative_snooze),
            PromptAction::Close => self.request_snooze(self.options.close_snooze),
        }
        self.hide_dialog();
    }

    /// Kick off the subscription flow without waiting for it; the
    /// dialog hides regardless of how the request ends.
    fn request_subscription(&self) {
        let subscriptions = Arc::clone(&self.subscriptions);
        tokio::spawn(async move {
            match subscriptions.request_subscription().await {
                Ok(()) => debug!("subscription request completed"),
                Err(err) if err.is_expected() => warn!(%err, "subscription request declined"),
                Err(err) => error!(%err, "subscription request failed"),
            }
        });
    }

    fn request_snooze(&self, directive: SnoozeDirective) {
        if directive.is_explicit() {
            self.triggers.snooze(directive);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.render(frame, area, &self.options, theme);
        }
    }
}

const fn signal_name(action: PromptAction) -> &'static str {
    match action {
        PromptAction::Positive => signal::POSITIVE_CLICK,
        PromptAction::Negative => signal::NEGATIVE_CLICK,
        PromptAction::Close => signal::CLOSE_CLICK,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{DialogConfig, NEGATIVE_SNOOZE_DEFAULT_MS, SnoozeDirective};
    use crate::host::{AssetLoader, IconResolver, LocaleResolver, SubscribeError, TriggerSpec};
    use crate::i18n::Translator;

    struct StubTriggers {
        snoozes: Mutex<Vec<SnoozeDirective>>,
    }

    #[async_trait]
    impl TriggerService for StubTriggers {
        async fn wait_for_trigger(&self, _spec: TriggerSpec) -> color_eyre::Result<()> {
            Ok(())
        }

        fn snooze(&self, directive: SnoozeDirective) {
            self.snoozes.lock().unwrap().push(directive);
        }
    }

    #[derive(Clone, Copy)]
    enum StubOutcome {
        Granted,
        Cancelled,
        Failure,
    }

    struct StubSubscriptions {
        requests: AtomicUsize,
        outcome: StubOutcome,
    }

    #[async_trait]
    impl SubscriptionService for StubSubscriptions {
        async fn request_subscription(&self) -> Result<(), SubscribeError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                StubOutcome::Granted => Ok(()),
                StubOutcome::Cancelled => Err(SubscribeError::Cancelled),
                StubOutcome::Failure => Err(SubscribeError::Other("boom".to_string())),
            }
        }
    }

    struct FixedState(SubscriptionState);

    impl SubscriptionStateSource for FixedState {
        fn subscription_state(&self) -> SubscriptionState {
            self.0
        }
    }

    struct NullAssets;

    impl AssetLoader for NullAssets {
        fn load_stylesheet(&self, _name: &str) {}
    }

    struct NoIcon;

    impl IconResolver for NoIcon {
        fn default_notification_icon(&self) -> Option<String> {
            None
        }
    }

    struct NoLocales;

    impl LocaleResolver for NoLocales {
        fn active_locales(&self) -> Vec<String> {
            Vec::new()
        }
    }

    struct Fixture {
        dialog: OptinDialog,
        triggers: Arc<StubTriggers>,
        subscriptions: Arc<StubSubscriptions>,
    }

    fn fixture(config: DialogConfig) -> Fixture {
        fixture_with(config, StubOutcome::Granted, None)
    }

    fn fixture_with(
        config: DialogConfig,
        outcome: StubOutcome,
        state: Option<SubscriptionState>,
    ) -> Fixture {
        let triggers = Arc::new(StubTriggers {
            snoozes: Mutex::new(Vec::new()),
        });
        let subscriptions = Arc::new(StubSubscriptions {
            requests: AtomicUsize::new(0),
            outcome,
        });
        let hosts = HostServices {
            triggers: Arc::clone(&triggers) as Arc<dyn TriggerService>,
            subscriptions: Arc::clone(&subscriptions) as Arc<dyn SubscriptionService>,
            subscription_state: state
                .map(|s| Arc::new(FixedState(s)) as Arc<dyn SubscriptionStateSource>),
            assets: Arc::new(NullAssets),
            icons: Arc::new(NoIcon),
            locales: Arc::new(NoLocales),
        };
        let options = DialogOptions::resolve(&config, &Translator::new(&[]), &NoIcon);
        let dialog = OptinDialog::new(options, &hosts, PromptKeybindings::default());
        Fixture {
            dialog,
            triggers,
            subscriptions,
        }
    }

    async fn drain_spawned() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_show_mounts_exactly_once() {
        let mut f = fixture(DialogConfig::default());
        let shows = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&shows);
        f.dialog.on(signal::SHOW, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Reaction::Proceed
        });

        f.dialog.show();
        f.dialog.show();

        assert!(f.dialog.is_presenting());
        assert!(f.dialog.mounted.is_some());
        assert_eq!(shows.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_vetoed_show_leaves_idle() {
        let mut f = fixture(DialogConfig::default());
        f.dialog.on(signal::SHOW, |_| Reaction::Veto);
        f.dialog.show();
        assert!(!f.dialog.is_presenting());
        assert!(f.dialog.mounted.is_none());
    }

    #[test]
    fn test_vetoed_hide_stays_shown() {
        let mut f = fixture(DialogConfig::default());
        f.dialog.show();
        f.dialog.on(signal::HIDE, |_| Reaction::Veto);
        f.dialog.hide_dialog();
        assert!(f.dialog.is_presenting());
        assert!(f.dialog.mounted.is_some());
    }

    #[test]
    fn test_hide_on_idle_emits_nothing() {
        let mut f = fixture(DialogConfig::default());
        let hides = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hides);
        f.dialog.on(signal::HIDE, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Reaction::Proceed
        });
        f.dialog.hide_dialog();
        assert_eq!(hides.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_positive_click_subscribes_and_hides() {
        let mut f = fixture(DialogConfig::default());
        f.dialog.show();
        f.dialog.handle_action(PromptAction::Positive);

        // Hides immediately, without awaiting the request.
        assert!(!f.dialog.is_presenting());
        assert!(f.dialog.mounted.is_none());

        drain_spawned().await;
        assert_eq!(f.subscriptions.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_positive_click_hides_even_when_request_fails() {
        for outcome in [StubOutcome::Cancelled, StubOutcome::Failure] {
            let mut f = fixture_with(DialogConfig::default(), outcome, None);
            f.dialog.show();
            f.dialog.handle_action(PromptAction::Positive);
            assert!(!f.dialog.is_presenting());

            drain_spawned().await;
            assert_eq!(f.subscriptions.requests.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_negative_click_snoozes_with_configured_duration() {
        let mut f = fixture(DialogConfig::default());
        f.dialog.show();
        f.dialog.handle_action(PromptAction::Negative);

        assert!(!f.dialog.is_presenting());
        assert_eq!(
            *f.triggers.snoozes.lock().unwrap(),
            vec![SnoozeDirective::For(NEGATIVE_SNOOZE_DEFAULT_MS)]
        );
    }

    #[test]
    fn test_negative_click_without_directive_skips_snooze() {
        let config = DialogConfig {
            negative_snooze: SnoozeDirective::Default,
            ..DialogConfig::default()
        };
        let mut f = fixture(config);
        f.dialog.show();
        f.dialog.handle_action(PromptAction::Negative);

        assert!(!f.dialog.is_presenting());
        assert!(f.triggers.snoozes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_close_click_uses_close_directive() {
        let config = DialogConfig {
            close_snooze: SnoozeDirective::Never,
            ..DialogConfig::default()
        };
        let mut f = fixture(config);
        f.dialog.show();
        f.dialog.handle_action(PromptAction::Close);

        assert!(!f.dialog.is_presenting());
        assert_eq!(
            *f.triggers.snoozes.lock().unwrap(),
            vec![SnoozeDirective::Never]
        );
    }

    #[test]
    fn test_vetoed_click_keeps_dialog_open() {
        let mut f = fixture(DialogConfig::default());
        f.dialog.show();
        f.dialog.on(signal::POSITIVE_CLICK, |_| Reaction::Veto);
        f.dialog.handle_action(PromptAction::Positive);

        assert!(f.dialog.is_presenting());
        assert!(f.dialog.mounted.is_some());
        assert_eq!(f.subscriptions.requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_settled_states_short_circuit_show() {
        for state in [
            SubscriptionState::Subscribed,
            SubscriptionState::Denied,
            SubscriptionState::Unsupported,
        ] {
            let mut f = fixture_with(DialogConfig::default(), StubOutcome::Granted, Some(state));
            f.dialog.show();
            assert!(!f.dialog.is_presenting(), "state {state} should not present");
            assert!(f.dialog.mounted.is_none());
        }
    }

    #[test]
    fn test_unsettled_state_presents() {
        let mut f = fixture_with(
            DialogConfig::default(),
            StubOutcome::Granted,
            Some(SubscriptionState::Other),
        );
        f.dialog.show();
        assert!(f.dialog.is_presenting());
    }

    #[test]
    fn test_show_again_after_hide() {
        let mut f = fixture(DialogConfig::default());
        f.dialog.show();
        f.dialog.hide_dialog();
        assert!(!f.dialog.is_presenting());
        f.dialog.show();
        assert!(f.dialog.is_presenting());
    }

    #[test]
    fn test_keys_are_consumed_only_while_mounted() {
        use crossterm::event::{KeyCode, KeyModifiers};

        let mut f = fixture(DialogConfig::default());
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(!f.dialog.handle_key(&key));

        f.dialog.show();
        assert!(f.dialog.handle_key(&key));

        let close = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(f.dialog.handle_key(&close));
        assert!(!f.dialog.is_presenting());
    }
}
