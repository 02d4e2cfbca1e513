//! Asynchronous notifications from the dispatch pipeline to the host layer.

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::{Error, Result};

/// Messages the pipeline emits for the surrounding application to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineMsg {
    /// A registered shortcut fired and its action was dispatched.
    Triggered {
        /// Canonical display string of the combination.
        combo: String,
        /// Display name of the action.
        action: String,
    },
    /// An action execution failed after dispatch.
    ActionFailed {
        /// Display name of the action.
        action: String,
        /// Rendered error.
        error: String,
    },
    /// A modified, unreserved, unregistered combination was captured; the
    /// host may prompt for a new binding.
    UnknownCombo {
        /// Canonical display string of the combination.
        combo: String,
    },
}

/// Sends pipeline notifications to the host layer.
#[derive(Clone)]
pub struct EngineNotifier {
    tx: UnboundedSender<EngineMsg>,
}

impl EngineNotifier {
    /// Create a notifier from the host's message channel.
    pub fn new(tx: UnboundedSender<EngineMsg>) -> Self {
        Self { tx }
    }

    /// Notify that a shortcut was triggered.
    pub fn send_triggered(&self, combo: String, action: String) -> Result<()> {
        self.send(EngineMsg::Triggered { combo, action })
    }

    /// Notify that an action execution failed.
    pub fn send_action_failed(&self, action: String, error: &Error) -> Result<()> {
        self.send(EngineMsg::ActionFailed {
            action,
            error: error.to_string(),
        })
    }

    /// Notify that an unknown combination was captured.
    pub fn send_unknown_combo(&self, combo: String) -> Result<()> {
        self.send(EngineMsg::UnknownCombo { combo })
    }

    fn send(&self, msg: EngineMsg) -> Result<()> {
        // Log every notification for traceability regardless of urgency.
        info!(msg = ?msg, "notification");
        self.tx.send(msg).map_err(|_| Error::ChannelClosed)
    }
}
