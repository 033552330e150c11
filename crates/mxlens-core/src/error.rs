//! Error taxonomy for the overlay.
//!
//! None of these are fatal to the page: the controller turns each of them into
//! an omitted line, a halted timer, or a logged no-op.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LensError {
    /// The host page-path accessor threw or the host global is gone.
    #[error("host not ready: {0}")]
    HostNotReady(String),
    /// A configuration value failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The configuration payload could not be parsed.
    #[error("config parse error: {0}")]
    Config(String),
    /// Both the primary clipboard API and the fallback copy path failed.
    #[error("clipboard copy failed: {0}")]
    Clipboard(String),
}

impl From<serde_json::Error> for LensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
