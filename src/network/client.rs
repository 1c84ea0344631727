//! Client counterpart
//!
//! Connects, sends the padded credential immediately followed by the
//! command text (plus sentinel and attachment when one is given), then
//! reads until the server closes. There is no response framing either:
//! end-of-response is the peer close or the idle timeout.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};

use crate::error::Result;
use crate::protocol::{Credential, SENTINEL};

/// A one-shot relay client
pub struct Client {
    addr: String,
    credential: Credential,
}

impl Client {
    pub fn new(addr: impl Into<String>, secret: &str) -> Self {
        Self {
            addr: addr.into(),
            credential: Credential::new(secret),
        }
    }

    /// Send one command (with optional attachment) and collect the
    /// response bytes.
    ///
    /// A transport reset while sending aborts the send phase and is
    /// returned as an error. A reset while receiving aborts the receive
    /// phase; whatever was collected up to that point is returned.
    pub fn send(&self, command: &str, attachment: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut stream = TcpStream::connect(&self.addr)?;
        stream.set_nodelay(true)?;

        self.send_request(&mut stream, command, attachment)?;

        // Half-close the write side so the server sees end-of-message
        // immediately instead of waiting out its idle timeout.
        let _ = stream.shutdown(Shutdown::Write);

        Ok(read_response(&mut stream))
    }

    fn send_request(
        &self,
        stream: &mut TcpStream,
        command: &str,
        attachment: Option<&[u8]>,
    ) -> Result<()> {
        stream.write_all(self.credential.as_bytes())?;
        stream.write_all(command.as_bytes())?;
        if let Some(attachment) = attachment {
            stream.write_all(SENTINEL)?;
            stream.write_all(attachment)?;
        }
        stream.flush()?;
        Ok(())
    }
}

/// Accumulate response bytes until the peer closes (zero-length read).
fn read_response(stream: &mut TcpStream) -> Vec<u8> {
    let mut response = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => response.extend_from_slice(&chunk[..n]),
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("connection reset on receiving: {e}");
                break;
            }
        }
    }
    response
}
