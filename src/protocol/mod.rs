//! Chat protocol implementation
//!
//! Handles line classification, command dispatch against the registry, and
//! the text of every server-to-client message.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
