//! Error types
//!
//! Defines domain-specific error types for the registry and the server.

use std::fmt;
use std::io;

use crate::client::SlotId;

/// Client registry errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Every slot is occupied.
    Full,
    /// The slot already carries a name; holds the existing name.
    AlreadyJoined(String),
    /// The slot id is out of range or not occupied.
    UnknownSlot(SlotId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Full => write!(f, "Client registry is full"),
            RegistryError::AlreadyJoined(name) => write!(f, "Already joined as {}", name),
            RegistryError::UnknownSlot(slot) => write!(f, "Unknown client slot: {}", slot),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Server startup and transport errors
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Bind(String, io::Error),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_to_server_error() {
        let err: ServerError = io::Error::new(io::ErrorKind::NotConnected, "listener gone").into();
        assert!(matches!(err, ServerError::IoError(_)));
        assert_eq!(err.to_string(), "I/O error: listener gone");
    }

    #[test]
    fn test_registry_error_messages() {
        assert_eq!(
            RegistryError::AlreadyJoined("Alice".to_string()).to_string(),
            "Already joined as Alice"
        );
        assert_eq!(
            RegistryError::UnknownSlot(SlotId::new(3)).to_string(),
            "Unknown client slot: #3"
        );
    }
}
