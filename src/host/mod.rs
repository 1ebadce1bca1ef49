//! Host capability contracts consumed by the opt-in dialog.
//!
//! The dialog core never talks to a concrete push SDK. Everything it
//! needs from its host environment — trigger evaluation, subscription
//! plumbing, assets, icons, locales — comes in through these narrow
//! traits, so hosts can wire in whatever backend they have. The
//! subscription-state probe is an explicitly optional capability:
//! hosts that cannot report it simply pass `None` and the dialog skips
//! that short-circuit.

pub mod sim;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SnoozeDirective;

/// Opaque trigger condition, forwarded to the trigger service verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerSpec(pub serde_json::Value);

/// Current push subscription state as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Subscribed,
    Denied,
    Unsupported,
    /// Not subscribed, or the host cannot tell.
    Other,
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subscribed => write!(f, "subscribed"),
            Self::Denied => write!(f, "denied"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Other => write!(f, "not subscribed"),
        }
    }
}

/// Why a subscription request did not complete.
///
/// `Cancelled` and `PermissionDenied` are expected outcomes of a
/// permission prompt and are only worth a warning; anything else is an
/// error.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("subscription cancelled by the user")]
    Cancelled,
    #[error("push permission denied")]
    PermissionDenied,
    #[error("subscription failed: {0}")]
    Other(String),
}

impl SubscribeError {
    /// Expected user-driven outcomes, as opposed to host failures.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::Cancelled | Self::PermissionDenied)
    }
}

/// Evaluates trigger conditions and owns the snooze window.
#[async_trait]
pub trait TriggerService: Send + Sync {
    /// Resolves once the trigger condition is satisfied.
    async fn wait_for_trigger(&self, spec: TriggerSpec) -> color_eyre::Result<()>;

    /// Suppress re-triggering per the directive. Fire and forget.
    fn snooze(&self, directive: SnoozeDirective);
}

/// Drives the actual push subscription flow.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn request_subscription(&self) -> Result<(), SubscribeError>;
}

/// Optional probe for the current subscription state.
pub trait SubscriptionStateSource: Send + Sync {
    fn subscription_state(&self) -> SubscriptionState;
}

/// Loads presentation assets by name. No return contract.
pub trait AssetLoader: Send + Sync {
    fn load_stylesheet(&self, name: &str);
}

/// Supplies the project's default notification icon, if any.
pub trait IconResolver: Send + Sync {
    fn default_notification_icon(&self) -> Option<String>;
}

/// Ordered locale tags preferred by the host.
pub trait LocaleResolver: Send + Sync {
    fn active_locales(&self) -> Vec<String>;
}

/// Bundle of host capabilities handed to the dialog at construction.
#[derive(Clone)]
pub struct HostServices {
    pub triggers: Arc<dyn TriggerService>,
    pub subscriptions: Arc<dyn SubscriptionService>,
    /// Present-or-absent by design; absent skips the state short-circuit.
    pub subscription_state: Option<Arc<dyn SubscriptionStateSource>>,
    pub assets: Arc<dyn AssetLoader>,
    pub icons: Arc<dyn IconResolver>,
    pub locales: Arc<dyn LocaleResolver>,
}
