//! Logging middleware
//!
//! Provides connection and command logging functionality.

use log::{debug, info, warn};
use std::net::SocketAddr;

use crate::client::SlotId;
use crate::error::RegistryError;
use crate::protocol::Command;

/// Log an admitted client connection
pub fn log_connection(client_addr: &SocketAddr, slot: SlotId) {
    info!("Client connected: {} (slot {})", client_addr, slot);
}

/// Log a connection turned away at accept
pub fn log_declined(client_addr: &SocketAddr, reason: &RegistryError) {
    warn!("Declining connection from {}: {}", client_addr, reason);
}

/// Log a client command
pub fn log_command(client_addr: &SocketAddr, command: &Command) {
    debug!("Received from {}: {:?}", client_addr, command);
}
