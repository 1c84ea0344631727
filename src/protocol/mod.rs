//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Wire Format (no version negotiation)
//!
//! ```text
//! Client → Server:
//! ┌────────────────┬─────────────────┬─────────┬────────────────┐
//! │ Credential(16) │  Command text   │ !~file  │  Attachment    │
//! │  space-padded  │ (shell-quoted)  │ (opt.)  │  (opt., raw)   │
//! └────────────────┴─────────────────┴─────────┴────────────────┘
//!
//! Server → Client:
//! ┌─────────────────────────────────────────────────────────────┐
//! │          Response bytes, then server closes                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no length prefix or terminator anywhere. End-of-message is
//! detected by idle timeout on the read side (or peer close, or the
//! configured byte ceiling). The `!~file` sentinel is the only in-band
//! structure: its first occurrence separates command text from a raw
//! binary attachment.

mod credential;
mod framing;
mod request;
mod splitter;
mod tokenizer;

pub use credential::{Credential, CREDENTIAL_LEN};
pub use framing::{read_credential, read_message};
pub use request::CommandRequest;
pub use splitter::{split, SENTINEL};
pub use tokenizer::tokenize;
