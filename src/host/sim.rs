//! Simulated host environment for the demo binary.
//!
//! Stands in for a real push SDK: triggers are satisfied after a
//! configurable delay, the permission prompt resolves to a CLI-chosen
//! outcome, and snooze directives shift or block the next trigger.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::SnoozeDirective;
use crate::host::{
    AssetLoader, HostServices, IconResolver, LocaleResolver, SubscribeError, SubscriptionService,
    SubscriptionState, SubscriptionStateSource, TriggerService, TriggerSpec,
};

const DEFAULT_TRIGGER_DELAY: Duration = Duration::from_secs(5);
const PERMISSION_PROMPT_DELAY: Duration = Duration::from_millis(600);

/// Outcome of the simulated permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PermissionOutcome {
    #[default]
    Granted,
    Denied,
    Cancelled,
    Failure,
}

#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    /// Delay before the trigger fires when the spec doesn't name one.
    pub trigger_delay: Option<Duration>,
    pub outcome: PermissionOutcome,
    /// Report push as unsupported, making the dialog inert.
    pub unsupported: bool,
}

#[derive(Debug, Clone, Copy)]
enum Snooze {
    None,
    Until { at: Instant, display: DateTime<Local> },
    Forever,
}

/// What the demo status bar shows about the simulated host.
#[derive(Debug, Clone, Copy)]
pub enum SnoozeSnapshot {
    None,
    Until(DateTime<Local>),
    Forever,
}

struct SimShared {
    state: Mutex<SubscriptionState>,
    snooze: Mutex<Snooze>,
}

/// In-process host SDK simulation.
///
/// [`Simulator::services`] hands out the capability bundle; the
/// simulator itself stays around so the app can inspect the state it
/// mutates.
#[derive(Clone)]
pub struct Simulator {
    shared: Arc<SimShared>,
    options: SimOptions,
}

impl Simulator {
    pub fn new(options: SimOptions) -> Self {
        let initial = if options.unsupported {
            SubscriptionState::Unsupported
        } else {
            SubscriptionState::Other
        };
        Self {
            shared: Arc::new(SimShared {
                state: Mutex::new(initial),
                snooze: Mutex::new(Snooze::None),
            }),
            options,
        }
    }

    pub fn services(&self) -> HostServices {
        let subscriptions = Arc::new(SimSubscriptions {
            shared: Arc::clone(&self.shared),
            outcome: self.options.outcome,
        });
        HostServices {
            triggers: Arc::new(SimTriggers {
                shared: Arc::clone(&self.shared),
                default_delay: self.options.trigger_delay.unwrap_or(DEFAULT_TRIGGER_DELAY),
            }),
            subscriptions: Arc::clone(&subscriptions) as Arc<dyn SubscriptionService>,
            subscription_state: Some(subscriptions as Arc<dyn SubscriptionStateSource>),
            assets: Arc::new(SimAssets),
            icons: Arc::new(SimIcons),
            locales: Arc::new(EnvLocales),
        }
    }

    pub fn subscription_state(&self) -> SubscriptionState {
        self.shared
            .state
            .lock()
            .map_or(SubscriptionState::Other, |state| *state)
    }

    pub fn snooze_snapshot(&self) -> SnoozeSnapshot {
        self.shared
            .snooze
            .lock()
            .map_or(SnoozeSnapshot::None, |snooze| match *snooze {
                Snooze::None => SnoozeSnapshot::None,
                Snooze::Until { display, .. } => SnoozeSnapshot::Until(display),
                Snooze::Forever => SnoozeSnapshot::Forever,
            })
    }
}

struct SimTriggers {
    shared: Arc<SimShared>,
    default_delay: Duration,
}

impl SimTriggers {
    fn spec_delay(&self, spec: &TriggerSpec) -> Duration {
        spec.0
            .get("delay_ms")
            .and_then(serde_json::Value::as_u64)
            .map_or(self.default_delay, Duration::from_millis)
    }
}

#[async_trait]
impl TriggerService for SimTriggers {
    async fn wait_for_trigger(&self, spec: TriggerSpec) -> color_eyre::Result<()> {
        tokio::time::sleep(self.spec_delay(&spec)).await;

        // A snooze set while waiting pushes the trigger out further.
        loop {
            let pending = match self.shared.snooze.lock() {
                Ok(snooze) => *snooze,
                Err(_) => Snooze::None,
            };
            match pending {
                Snooze::None => break,
                Snooze::Until { at, .. } if at <= Instant::now() => break,
                Snooze::Until { at, .. } => tokio::time::sleep_until(at).await,
                Snooze::Forever => std::future::pending::<()>().await,
            }
        }
        Ok(())
    }

    fn snooze(&self, directive: SnoozeDirective) {
        let Ok(mut snooze) = self.shared.snooze.lock() else {
            return;
        };
        *snooze = match directive {
            SnoozeDirective::Default => Snooze::None,
            SnoozeDirective::Never => Snooze::Forever,
            SnoozeDirective::For(ms) => Snooze::Until {
                at: Instant::now() + Duration::from_millis(ms),
                display: Local::now() + chrono::Duration::milliseconds(ms.min(i64::MAX as u64) as i64),
            },
        };
        info!(%directive, "trigger snooze requested");
    }
}

struct SimSubscriptions {
    shared: Arc<SimShared>,
    outcome: PermissionOutcome,
}

#[async_trait]
impl SubscriptionService for SimSubscriptions {
    async fn request_subscription(&self) -> Result<(), SubscribeError> {
        // Simulated permission prompt round trip.
        tokio::time::sleep(PERMISSION_PROMPT_DELAY).await;
        match self.outcome {
            PermissionOutcome::Granted => {
                if let Ok(mut state) = self.shared.state.lock() {
                    *state = SubscriptionState::Subscribed;
                }
                Ok(())
            }
            PermissionOutcome::Denied => {
                if let Ok(mut state) = self.shared.state.lock() {
                    *state = SubscriptionState::Denied;
                }
                Err(SubscribeError::PermissionDenied)
            }
            PermissionOutcome::Cancelled => Err(SubscribeError::Cancelled),
            PermissionOutcome::Failure => {
                Err(SubscribeError::Other("push service unreachable".to_string()))
            }
        }
    }
}

impl SubscriptionStateSource for SimSubscriptions {
    fn subscription_state(&self) -> SubscriptionState {
        self.shared
            .state
            .lock()
            .map_or(SubscriptionState::Other, |state| *state)
    }
}

struct SimAssets;

impl AssetLoader for SimAssets {
    fn load_stylesheet(&self, name: &str) {
        debug!(name, "stylesheet load requested");
    }
}

struct SimIcons;

impl IconResolver for SimIcons {
    fn default_notification_icon(&self) -> Option<String> {
        Some("🔔".to_string())
    }
}

/// Locale preference from the process environment.
struct EnvLocales;

impl LocaleResolver for EnvLocales {
    fn active_locales(&self) -> Vec<String> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .filter(|value| !value.is_empty() && value != "C")
            .map(|value| value.split('.').next().unwrap_or(&value).to_string())
            .take(1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_fires_after_spec_delay() {
        let sim = Simulator::new(SimOptions {
            trigger_delay: None,
            outcome: PermissionOutcome::Granted,
            unsupported: false,
        });
        let services = sim.services();
        let spec = TriggerSpec(serde_json::json!({ "delay_ms": 10 }));
        services.triggers.wait_for_trigger(spec).await.unwrap();
    }

    #[tokio::test]
    async fn test_granted_outcome_updates_state() {
        let sim = Simulator::new(SimOptions {
            trigger_delay: None,
            outcome: PermissionOutcome::Granted,
            unsupported: false,
        });
        let services = sim.services();
        assert_eq!(sim.subscription_state(), SubscriptionState::Other);
        services.subscriptions.request_subscription().await.unwrap();
        assert_eq!(sim.subscription_state(), SubscriptionState::Subscribed);
    }

    #[tokio::test]
    async fn test_denied_outcome_is_expected_error() {
        let sim = Simulator::new(SimOptions {
            trigger_delay: None,
            outcome: PermissionOutcome::Denied,
            unsupported: false,
        });
        let services = sim.services();
        let err = services.subscriptions.request_subscription().await.unwrap_err();
        assert!(err.is_expected());
        assert_eq!(sim.subscription_state(), SubscriptionState::Denied);
    }

    #[test]
    fn test_snooze_never_is_recorded() {
        let sim = Simulator::new(SimOptions {
            trigger_delay: None,
            outcome: PermissionOutcome::Granted,
            unsupported: false,
        });
        let services = sim.services();
        services.triggers.snooze(SnoozeDirective::Never);
        assert!(matches!(sim.snooze_snapshot(), SnoozeSnapshot::Forever));
    }
}
