//! Error types and result alias for the registry crate.
use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type used throughout this crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Another shortcut already owns the combination. Carries the existing
    /// binding's description so the caller can surface it to the user.
    #[error("{combo} is already bound: {existing}")]
    Conflict {
        /// Canonical display string of the contested combination.
        combo: String,
        /// Description of the shortcut that owns it.
        existing: String,
    },

    /// I/O failure in the backing store.
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing store's contents could not be decoded.
    #[error("Store decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
