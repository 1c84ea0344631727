//! Configuration for cmdrelay
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

/// Main configuration for a cmdrelay server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Idle-timeout on connection reads (milliseconds). This is the framing
    /// mechanism: a read that blocks longer than this ends the message.
    pub idle_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Shared secret; padded/truncated to 16 bytes on the wire
    pub secret: String,

    /// Maximum total bytes accepted per message
    pub recv_data_limit: usize,

    /// Read increment size (bytes per read call)
    pub read_chunk_size: usize,

    // -------------------------------------------------------------------------
    // Handler Configuration
    // -------------------------------------------------------------------------
    /// Upper bound on `exec` child-process runtime (seconds)
    pub exec_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:50008".to_string(),
            idle_timeout_ms: 1500,
            secret: "123321".to_string(),
            recv_data_limit: 100 * 1024,
            read_chunk_size: 1024,
            exec_timeout_secs: 600,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Idle timeout as a `Duration`
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Exec timeout as a `Duration`
    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the idle timeout (in milliseconds)
    pub fn idle_timeout_ms(mut self, ms: u64) -> Self {
        self.config.idle_timeout_ms = ms;
        self
    }

    /// Set the shared secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = secret.into();
        self
    }

    /// Set the maximum bytes accepted per message
    pub fn recv_data_limit(mut self, limit: usize) -> Self {
        self.config.recv_data_limit = limit;
        self
    }

    /// Set the read increment size (in bytes)
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    /// Set the exec timeout (in seconds)
    pub fn exec_timeout_secs(mut self, secs: u64) -> Self {
        self.config.exec_timeout_secs = secs;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
