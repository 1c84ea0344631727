//! cmdrelay Client Binary
//!
//! Sends one command (with optional file attachment) to a relay server and
//! renders or saves the response.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cmdrelay::network::Client;

/// cmdrelay Client
#[derive(Parser, Debug)]
#[command(name = "cmdrelay-client")]
#[command(about = "Send a command to a cmdrelay server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, default_value = "50008")]
    port: u16,

    /// Shared secret to present
    #[arg(short, long, default_value = "123321")]
    password: String,

    /// Command text to send (shell-quoted tokens)
    #[arg(short, long, default_value = "helloworld")]
    command: String,

    /// File to attach after the command
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write the response to this file instead of rendering it
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let attachment = match &args.file {
        Some(path) => match fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                eprintln!("Error: cannot read {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => None,
    };

    let client = Client::new(format!("{}:{}", args.host, args.port), &args.password);
    let response = match client.send(&args.command, attachment.as_deref()) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &response) {
                eprintln!("Error: cannot write {}: {e}", path.display());
                std::process::exit(1);
            }
            println!("Saved {} bytes to {}.", response.len(), path.display());
        }
        None => render(&response),
    }
}

/// Render a response on stdout: indented text when it decodes, a length
/// notice when it doesn't.
fn render(response: &[u8]) {
    match std::str::from_utf8(response) {
        Ok(text) => println!("  Returned:\n    {}", text.replace('\n', "\n    ")),
        Err(_) => println!(
            "  Returned {} bytes of binary data (use --output to save).",
            response.len()
        ),
    }
}
