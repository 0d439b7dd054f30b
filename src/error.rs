//! Error types for crossdeck
//!
//! Module-specific error types using thiserror for clear error propagation.
//! A load failure is never fatal: the offending request is dropped and the
//! deck returns to idle. Malformed request timing is not an error at all;
//! it is logged and played degraded.

use thiserror::Error;

/// Main error type for crossdeck
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Resource cannot be opened or decoded by the output device
    #[error("Load error: {0}")]
    Load(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine command channel closed (engine shut down)
    #[error("Engine unavailable: {0}")]
    Engine(String),
}

/// Convenience Result type using crossdeck Error
pub type Result<T> = std::result::Result<T, Error>;
