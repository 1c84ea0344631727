//! Error types for cmdrelay
//!
//! Provides a unified error type for all operations.
//!
//! The failure taxonomy maps onto connection behavior:
//! - `Io` (transport): logged, the connection or attempt is aborted, never
//!   fatal to the process.
//! - `AuthFailed`: the connection is closed with no response.
//! - `Parse`: the literal parse-failure payload is returned and the server
//!   keeps serving.
//! - `Capability` / `ExecTimeout`: caught at the handler boundary and turned
//!   into a textual error payload.

use thiserror::Error;

/// Result type alias using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type for cmdrelay operations
#[derive(Debug, Error)]
pub enum RelayError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("authorization failed")]
    AuthFailed,

    #[error("parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Handler Errors
    // -------------------------------------------------------------------------
    #[error("capability unavailable: {0}")]
    Capability(String),

    #[error("command timed out after {0} seconds")]
    ExecTimeout(u64),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Short kind name used when a handler failure is rendered as a
    /// `"Error: <kind>: <detail>"` response payload.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RelayError::Io(_) => "IoError",
            RelayError::AuthFailed => "AuthError",
            RelayError::Parse(_) => "ParseError",
            RelayError::Capability(_) => "CapabilityError",
            RelayError::ExecTimeout(_) => "TimeoutError",
            RelayError::Config(_) => "ConfigError",
        }
    }
}
