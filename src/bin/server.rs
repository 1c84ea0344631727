//! cmdrelay Server Binary
//!
//! Starts the TCP relay server.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cmdrelay::capability::Capabilities;
use cmdrelay::network::Server;
use cmdrelay::{Config, Registry};

/// cmdrelay Server
#[derive(Parser, Debug)]
#[command(name = "cmdrelay-server")]
#[command(about = "Minimal remote-command relay server")]
#[command(version)]
struct Args {
    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(long, default_value = "50008")]
    port: u16,

    /// Shared secret clients must present
    #[arg(short, long, default_value = "123321")]
    password: String,

    /// Maximum amount of data that can be received per message (in bytes)
    #[arg(long, default_value = "102400")]
    recv_data_limit: usize,

    /// Idle timeout that ends a message (in milliseconds)
    #[arg(long, default_value = "1500")]
    idle_timeout_ms: u64,

    /// Upper bound on `exec` child runtime (in seconds)
    #[arg(long, default_value = "600")]
    exec_timeout: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cmdrelay=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("cmdrelay server v{}", cmdrelay::VERSION);

    let config = Config::builder()
        .listen_addr(format!("{}:{}", args.host, args.port))
        .secret(&args.password)
        .recv_data_limit(args.recv_data_limit)
        .idle_timeout_ms(args.idle_timeout_ms)
        .exec_timeout_secs(args.exec_timeout)
        .build();

    let registry = Registry::builtin(Capabilities::system(), config.exec_timeout());

    let server = match Server::bind(config, registry) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("failed to bind: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }

    tracing::info!("server stopped");
}
