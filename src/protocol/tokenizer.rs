//! Command tokenization
//!
//! Command bytes are decoded as UTF-8 and split into argv-like tokens with
//! shell quoting rules (single/double quotes group whitespace). Decode
//! failure, unterminated quoting, and an empty token list are all parse
//! failures; the dispatcher renders those as the literal parse-failure
//! payload rather than letting them reach the connection layer.
//!
//! Tokenization preserves case. Command-name matching is case-insensitive
//! and happens in the dispatcher.

use crate::error::{RelayError, Result};

/// Tokenize command bytes into shell-style tokens.
pub fn tokenize(command: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(command)
        .map_err(|e| RelayError::Parse(format!("command is not valid UTF-8: {e}")))?;

    let tokens = shlex::split(text)
        .ok_or_else(|| RelayError::Parse("unbalanced quoting in command".to_string()))?;

    if tokens.is_empty() {
        return Err(RelayError::Parse("empty command".to_string()));
    }

    Ok(tokens)
}
