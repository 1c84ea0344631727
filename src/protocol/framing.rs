//! Message framing
//!
//! There is no length field on the wire. A message ends when the peer
//! closes, when a read blocks past the connection's idle timeout, or when
//! the configured byte ceiling is reached. The caller arms the timeout on
//! the underlying socket (`set_read_timeout`); this module only interprets
//! the resulting `WouldBlock`/`TimedOut` errors as end-of-message.
//!
//! A message that pauses longer than the idle timeout mid-send is
//! truncated at the pause. Size the timeout for the slowest expected
//! sender.

use std::io::{ErrorKind, Read};

use crate::error::Result;
use crate::protocol::credential::CREDENTIAL_LEN;

/// Read the credential prefix: a single read call of up to 16 bytes,
/// performed before any other processing. Returns however many bytes the
/// one read produced (the comparison side tolerates short, unpadded
/// credentials).
pub fn read_credential<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut buf = [0u8; CREDENTIAL_LEN];
    let n = reader.read(&mut buf)?;
    Ok(buf[..n].to_vec())
}

/// Accumulate a complete message from `reader`.
///
/// Reads `chunk_size` bytes at a time, appending to the buffer, until:
/// - a read returns zero bytes (peer closed or half-closed),
/// - a read times out (end of message, not an error), or
/// - the total byte budget `limit` is exhausted.
///
/// A connection reset (or any other transport error) aborts assembly and
/// is returned to the caller.
pub fn read_message<R: Read>(reader: &mut R, limit: usize, chunk_size: usize) -> Result<Vec<u8>> {
    let mut message = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];

    while message.len() < limit {
        let want = chunk.len().min(limit - message.len());
        match reader.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(n) => message.extend_from_slice(&chunk[..n]),
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => break,
            Err(ref e) if e.kind() == ErrorKind::TimedOut => break,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(message)
}
