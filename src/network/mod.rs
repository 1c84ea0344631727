//! Network Module
//!
//! The server's accept/connection loop and the symmetric client.

mod client;
mod server;

pub use client::Client;
pub use server::Server;
