//! Command request
//!
//! The decoded form of one inbound message: argv-like tokens plus an
//! optional binary attachment. Built once per connection and passed to the
//! dispatcher by reference; nothing about it is mutated after construction.

use crate::error::Result;
use crate::protocol::{split, tokenize};

/// A decoded command request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    tokens: Vec<String>,
    attachment: Option<Vec<u8>>,
}

impl CommandRequest {
    /// Build a request from already-separated parts.
    pub fn new(tokens: Vec<String>, attachment: Option<Vec<u8>>) -> Self {
        Self { tokens, attachment }
    }

    /// Decode a raw message buffer: split off any attachment at the
    /// sentinel, then tokenize the command text.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (command_bytes, attachment) = split(raw);
        let tokens = tokenize(command_bytes)?;
        Ok(Self {
            tokens,
            attachment: attachment.map(<[u8]>::to_vec),
        })
    }

    /// The command name (token 0), as sent. Matching is the dispatcher's
    /// job and is case-insensitive.
    pub fn name(&self) -> &str {
        &self.tokens[0]
    }

    /// Arguments following the command name
    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// All tokens, command name included
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The binary attachment, if one followed the sentinel
    pub fn attachment(&self) -> Option<&[u8]> {
        self.attachment.as_deref()
    }
}
