//! Credential handling
//!
//! The shared secret travels as exactly 16 bytes: right-padded with spaces,
//! or truncated, whichever brings it to length. Comparison strips trailing
//! whitespace from both sides first and is plain byte equality — no
//! constant-time guarantee is part of the contract.

/// Wire width of the credential
pub const CREDENTIAL_LEN: usize = 16;

/// A shared secret, normalized to its 16-byte wire form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential([u8; CREDENTIAL_LEN]);

impl Credential {
    /// Build a credential from a configured secret, padding with trailing
    /// spaces or truncating to exactly 16 bytes.
    pub fn new(secret: &str) -> Self {
        let mut wire = [b' '; CREDENTIAL_LEN];
        let bytes = secret.as_bytes();
        let n = bytes.len().min(CREDENTIAL_LEN);
        wire[..n].copy_from_slice(&bytes[..n]);
        Self(wire)
    }

    /// The 16-byte wire form (what a client sends)
    pub fn as_bytes(&self) -> &[u8; CREDENTIAL_LEN] {
        &self.0
    }

    /// Compare against bytes received on the wire. Trailing whitespace is
    /// stripped from both sides before the equality check, so a short read
    /// of an unpadded secret still matches.
    pub fn matches(&self, wire: &[u8]) -> bool {
        strip_trailing_ws(wire) == strip_trailing_ws(&self.0)
    }
}

fn strip_trailing_ws(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
