//! Configuration management for the chat relay
//!
//! Values come from built-in defaults, then an optional `config.toml`, then
//! `CHAT_RELAY_*` environment variables. A port given on the command line is
//! applied last by the binary.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Complete server configuration, loaded once at startup
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address the listener binds to
    /// Environment: CHAT_RELAY_BIND_ADDRESS
    pub bind_address: String,

    /// TCP port the listener binds to
    /// Environment: CHAT_RELAY_PORT
    pub port: u16,

    /// Number of client slots in the registry
    /// Environment: CHAT_RELAY_MAX_CLIENTS
    pub max_clients: usize,

    /// Longest accepted protocol line in bytes, terminator included
    pub max_line_length: usize,

    /// Outbound messages buffered per connection before fan-out drops for it
    pub outbound_queue_depth: usize,

    /// Seconds a closing session waits for its queued output to flush
    pub drain_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2323,
            max_clients: 20,
            max_line_length: 8192,
            outbound_queue_depth: 64,
            drain_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("CHAT_RELAY"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the configured port, e.g. with one given on the command line
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_line_length == 0 {
            return Err(config::ConfigError::Message(
                "max_line_length must be greater than 0".into(),
            ));
        }

        if self.outbound_queue_depth == 0 {
            return Err(config::ConfigError::Message(
                "outbound_queue_depth must be greater than 0".into(),
            ));
        }

        if self.drain_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "drain_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Drain timeout as Duration
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}
