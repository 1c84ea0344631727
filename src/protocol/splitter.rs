//! Message splitting
//!
//! A raw message optionally carries a binary attachment after the in-band
//! `!~file` sentinel. The split is byte-level: attachment bytes are
//! arbitrary binary and must never pass through a text decode.
//!
//! The sentinel is not escaped. An attachment that happens to contain the
//! literal bytes `!~file` before its real start corrupts the split; this is
//! a known limitation of the wire format, kept for compatibility.

/// In-band delimiter between command text and attachment bytes
pub const SENTINEL: &[u8] = b"!~file";

/// Split a raw message at the first occurrence of the sentinel.
///
/// Returns `(command_bytes, Some(attachment))` when the sentinel is
/// present, `(raw, None)` otherwise.
pub fn split(raw: &[u8]) -> (&[u8], Option<&[u8]>) {
    match find_sentinel(raw) {
        Some(at) => (&raw[..at], Some(&raw[at + SENTINEL.len()..])),
        None => (raw, None),
    }
}

fn find_sentinel(raw: &[u8]) -> Option<usize> {
    if raw.len() < SENTINEL.len() {
        return None;
    }
    raw.windows(SENTINEL.len()).position(|w| w == SENTINEL)
}
