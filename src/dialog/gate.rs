use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::command::Command;
use crate::host::{TriggerService, TriggerSpec};

/// Watches the host trigger condition and requests a presentation when
/// it fires.
///
/// Each [`TriggerGate::arm`] call is a one-shot registration: the gate
/// asks for the dialog at most once per call and never re-fires on its
/// own. Re-arming after a snoozed dismissal is the host's decision.
/// Trigger failures are swallowed here; a failed registration just
/// means the dialog never shows.
pub struct TriggerGate {
    triggers: Arc<dyn TriggerService>,
    command_tx: UnboundedSender<Command>,
}

impl TriggerGate {
    pub fn new(triggers: Arc<dyn TriggerService>, command_tx: UnboundedSender<Command>) -> Self {
        Self {
            triggers,
            command_tx,
        }
    }

    pub fn arm(&self, spec: TriggerSpec) {
        let triggers = Arc::clone(&self.triggers);
        let command_tx = self.command_tx.clone();
        tokio::spawn(async move {
            match triggers.wait_for_trigger(spec).await {
                Ok(()) => {
                    let _ = command_tx.send(Command::ShowDialog);
                }
                Err(err) => debug!(%err, "trigger registration failed"),
            }
        });
    }
}
