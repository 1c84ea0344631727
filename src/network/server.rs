//! TCP Server
//!
//! Accepts one connection at a time and runs it through the protocol
//! engine. Per-connection state machine:
//!
//! ```text
//! ACCEPTED → AUTHENTICATING → (REJECTED | READING)
//!          → (TIMED_OUT | CLOSED_BY_PEER) → DISPATCHING
//!          → RESPONDING → CLOSED
//! ```
//!
//! `REJECTED` and any transport failure go straight to `CLOSED` with no
//! response. Every path closes the connection exactly once (the stream is
//! dropped when `serve_connection` returns). The accept loop only exits on
//! the `exit` command or process shutdown.

use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};

use crate::config::Config;
use crate::dispatch::{Outcome, Registry, PARSE_FAILURE};
use crate::error::Result;
use crate::protocol::{read_credential, read_message, CommandRequest, Credential};

/// Whether the accept loop keeps going after a connection
enum Flow {
    Continue,
    Shutdown,
}

/// TCP server for cmdrelay
pub struct Server {
    config: Config,
    registry: Registry,
    credential: Credential,
    listener: TcpListener,
}

impl Server {
    /// Bind the listener and prepare to serve.
    pub fn bind(config: Config, registry: Registry) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        let credential = Credential::new(&config.secret);
        Ok(Self {
            config,
            registry,
            credential,
            listener,
        })
    }

    /// The address actually bound (useful with a `:0` port)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve connections until the `exit` command (blocking).
    ///
    /// Transport failures, authentication rejections, and parse failures
    /// are logged and leave the server accepting the next connection.
    pub fn run(&self) -> Result<()> {
        tracing::info!("listening on {}", self.local_addr()?);

        loop {
            let (stream, peer) = match self.listener.accept() {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!("accept failed: {e}");
                    continue;
                }
            };

            tracing::info!("connection from {peer}");
            match self.serve_connection(stream, peer) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Shutdown) => {
                    tracing::info!("exit command received, shutting down");
                    return Ok(());
                }
                Err(e) => tracing::warn!("connection {peer} failed: {e}"),
            }
        }
    }

    /// Fully service one connection. The stream is dropped (closed) on
    /// every return path.
    fn serve_connection(&self, mut stream: TcpStream, peer: SocketAddr) -> Result<Flow> {
        let timeout = self.config.idle_timeout();
        if !timeout.is_zero() {
            stream.set_read_timeout(Some(timeout))?;
        }

        // AUTHENTICATING: the 16-byte credential prefix comes before any
        // command content.
        let wire_credential = match read_credential(&mut stream) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("error reading credential from {peer}: {e}");
                return Ok(Flow::Continue);
            }
        };
        if !self.credential.matches(&wire_credential) {
            tracing::warn!("authorization failed for {peer}");
            return Ok(Flow::Continue);
        }
        tracing::info!("authorization succeeded for {peer}");

        // READING: idle timeout or peer close ends the message.
        let raw = match read_message(
            &mut stream,
            self.config.recv_data_limit,
            self.config.read_chunk_size,
        ) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("error reading message from {peer}: {e}");
                return Ok(Flow::Continue);
            }
        };

        // DISPATCHING
        let request = match CommandRequest::parse(&raw) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("parse failure from {peer}: {e}");
                self.respond(&mut stream, peer, PARSE_FAILURE);
                return Ok(Flow::Continue);
            }
        };
        tracing::info!("received command: {}", request.tokens().join(" "));

        match self.registry.dispatch(&request) {
            Outcome::Exit => Ok(Flow::Shutdown),
            Outcome::Respond(payload) => {
                self.log_response(&payload);
                self.respond(&mut stream, peer, &payload);
                Ok(Flow::Continue)
            }
        }
    }

    /// RESPONDING: write the payload; a peer that vanished mid-send is
    /// logged, not escalated.
    fn respond(&self, stream: &mut TcpStream, peer: SocketAddr, payload: &[u8]) {
        let result = stream.write_all(payload).and_then(|()| stream.flush());
        if let Err(e) = result {
            match e.kind() {
                std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("{peer} disconnected before response could be sent: {e}");
                }
                _ => tracing::warn!("error writing response to {peer}: {e}"),
            }
        }
    }

    /// Echo short textual responses on the operator console.
    fn log_response(&self, payload: &[u8]) {
        if payload.len() < 1024 {
            match std::str::from_utf8(payload) {
                Ok(text) => tracing::info!("response: {text}"),
                Err(_) => tracing::debug!("binary response ({} bytes)", payload.len()),
            }
        } else {
            tracing::debug!("response: {} bytes", payload.len());
        }
    }
}
