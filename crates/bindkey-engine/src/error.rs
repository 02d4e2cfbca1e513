//! Error types and result alias for the engine crate.
use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by a single `execute` call.
///
/// Every variant is terminal for the call that produced it; the engine
/// remains usable afterwards.
#[derive(Debug, Error)]
pub enum Error {
    /// No application resolves to the given bundle identifier.
    #[error("Application not found: {0}")]
    AppNotFound(String),

    /// The OS resource opener reported failure for a URL.
    #[error("Failed to open URL: {0}")]
    UrlOpenFailed(String),

    /// A script or process exited non-zero; carries the captured output.
    #[error("Script failed: {0}")]
    ScriptFailed(String),

    /// The external automation service reported failure; the message is
    /// propagated verbatim.
    #[error("Automation failed: {0}")]
    Automation(String),

    /// Clipboard mutation or synthetic paste injection failed.
    #[error("Failed to type text")]
    TextTypingFailed,

    /// Catch-all for action variants with no defined handling.
    #[error("This action is not supported")]
    UnsupportedAction,

    /// I/O failure, e.g. reading a script file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The notification channel has been closed by the receiver.
    #[error("Notification channel closed")]
    ChannelClosed,
}
