//! Error types for srcon
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for srcon operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Packet size {size} exceeds maximum of {max}")]
    PacketTooLarge { size: i32, max: i32 },

    #[error("Truncated frame: {0}")]
    TruncatedFrame(String),

    // -------------------------------------------------------------------------
    // Authentication Errors
    // -------------------------------------------------------------------------
    #[error("Packet ID {got} does not match auth request ID {expected}")]
    AuthSequence { expected: i32, got: i32 },

    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl RconError {
    /// True for errors raised by the socket layer (dial, read, write,
    /// timeout) as opposed to protocol-level failures.
    pub fn is_io(&self) -> bool {
        matches!(self, RconError::Io(_) | RconError::Connection(_))
    }
}
