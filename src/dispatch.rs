//! Command dispatch
//!
//! Maps a lowercase command name to a handler, invokes it, and captures the
//! result or failure as a response payload. The registry is built once at
//! startup and immutable afterwards; lookups are case-insensitive on
//! token 0.
//!
//! A handler's own failure never propagates: once a connection is
//! authenticated and parsed, it always gets *some* response (the one
//! exception is `exit`, which is terminal and sends nothing).

use std::collections::HashMap;
use std::time::Duration;

use crate::capability::Capabilities;
use crate::error::{RelayError, Result};
use crate::handlers;
use crate::protocol::CommandRequest;

/// Payload returned when command text fails to decode or tokenize
pub const PARSE_FAILURE: &[u8] = b"Invalid command, error while parsing.";

/// Payload returned for an unregistered command name
pub const UNKNOWN_COMMAND: &[u8] = b"Unknown command.";

/// What a handler asks the connection loop to do
pub enum Action {
    /// Send these bytes and close the connection
    Reply(Vec<u8>),

    /// Terminate the server process; no response is sent
    Shutdown,
}

/// Dispatch result as seen by the connection loop
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Response bytes to write back
    Respond(Vec<u8>),

    /// The `exit` command: stop the server without responding
    Exit,
}

/// Shared context handed to every handler invocation
pub struct HandlerContext {
    /// External capabilities (shell, screen, camera, cursor)
    pub caps: Capabilities,

    /// Upper bound on `exec` child runtime
    pub exec_timeout: Duration,
}

type HandlerFn = fn(&HandlerContext, &CommandRequest) -> Result<Action>;

/// Immutable command-name → handler mapping
pub struct Registry {
    handlers: HashMap<&'static str, HandlerFn>,
    ctx: HandlerContext,
}

impl Registry {
    /// Build the canonical command set over the given capabilities.
    pub fn builtin(caps: Capabilities, exec_timeout: Duration) -> Self {
        let mut map: HashMap<&'static str, HandlerFn> = HashMap::new();
        map.insert("helloworld", handlers::hello_world);
        map.insert("echo", handlers::echo);
        map.insert("savefile", handlers::save_file);
        map.insert("exec", handlers::exec);
        map.insert("screen", handlers::screen);
        map.insert("webcamphoto", handlers::webcam_photo);
        map.insert("mouse", handlers::mouse);
        map.insert("exit", handlers::exit);

        Self {
            handlers: map,
            ctx: HandlerContext { caps, exec_timeout },
        }
    }

    /// Look up token 0 (lowercased) and invoke its handler.
    ///
    /// Unknown names and handler failures both come back as `Respond`
    /// payloads; only `exit` yields `Outcome::Exit`.
    pub fn dispatch(&self, request: &CommandRequest) -> Outcome {
        let Some(name) = request.tokens().first() else {
            return Outcome::Respond(PARSE_FAILURE.to_vec());
        };

        let Some(handler) = self.handlers.get(name.to_ascii_lowercase().as_str()) else {
            return Outcome::Respond(UNKNOWN_COMMAND.to_vec());
        };

        match handler(&self.ctx, request) {
            Ok(Action::Reply(payload)) => Outcome::Respond(payload),
            Ok(Action::Shutdown) => Outcome::Exit,
            Err(e) => Outcome::Respond(failure_payload(&e)),
        }
    }
}

/// Render a handler failure as a textual response payload.
fn failure_payload(error: &RelayError) -> Vec<u8> {
    let detail = match error {
        RelayError::Io(e) => e.to_string(),
        RelayError::Capability(msg) | RelayError::Parse(msg) | RelayError::Config(msg) => {
            msg.clone()
        }
        other => other.to_string(),
    };
    format!("Error: {}: {}", error.kind_name(), detail).into_bytes()
}
