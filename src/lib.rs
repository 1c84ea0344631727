//! # cmdrelay
//!
//! A minimal remote-command relay:
//! - Shared-secret authentication (fixed 16-byte credential)
//! - Idle-timeout framing (no length prefix on the wire)
//! - In-band sentinel split between command text and a binary attachment
//! - Shell-style command tokenization and named-handler dispatch
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Listener                            │
//! │              (One Connection at a Time)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Connection Loop                             │
//! │    authenticate → frame → split → tokenize → dispatch        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Registry   │          │ Capabilities│
//!   │ (Handlers)  │          │ (Shell/Dev) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod capability;
pub mod dispatch;
pub mod handlers;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RelayError, Result};
pub use config::Config;
pub use dispatch::{Outcome, Registry};
pub use protocol::{CommandRequest, Credential};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cmdrelay
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
