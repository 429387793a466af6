//! Command handlers module for the chat relay.
//!
//! Each handler runs one parsed command for a session against the shared
//! registry and tells the session what to reply and whether to keep reading.

use crate::client::{ClientRegistry, ClientSession};
use crate::error::RegistryError;
use crate::protocol::responses;
use crate::protocol::{Command, CommandResult, CommandStatus};
use log::debug;

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `session` - Session of the client sending the command.
/// * `command` - Parsed command.
/// * `registry` - Shared client registry.
///
/// # Returns
///
/// * `CommandResult` - Status plus an optional reply for the requesting client.
pub async fn handle_command(
    session: &mut ClientSession,
    command: &Command,
    registry: &ClientRegistry,
) -> CommandResult {
    match command {
        Command::Join(name) => handle_cmd_join(session, name, registry).await,
        Command::Who => handle_cmd_who(registry).await,
        Command::Leave => handle_cmd_leave(session, registry).await,
        Command::Message(text) => handle_cmd_message(session, text, registry).await,
    }
}

/// Handles JOIN: names the session's slot. A repeated JOIN is answered with
/// the name already held and nothing is broadcast.
async fn handle_cmd_join(
    session: &mut ClientSession,
    name: &str,
    registry: &ClientRegistry,
) -> CommandResult {
    let Some(slot) = session.slot() else {
        return released();
    };

    match registry.join(slot, name).await {
        Ok(_) => {
            session.activate();
            CommandResult {
                status: CommandStatus::Success,
                message: None,
            }
        }
        Err(RegistryError::AlreadyJoined(existing)) => CommandResult {
            status: CommandStatus::Failure(format!("already joined as {}", existing)),
            message: Some(responses::already_joined(&existing)),
        },
        Err(e) => CommandResult {
            status: CommandStatus::Failure(e.to_string()),
            message: None,
        },
    }
}

/// Handles WHO: replies with the current roster, one name per line.
async fn handle_cmd_who(registry: &ClientRegistry) -> CommandResult {
    let names = registry.who().await;

    CommandResult {
        status: CommandStatus::Success,
        message: (!names.is_empty()).then(|| responses::roster(&names)),
    }
}

/// Handles LEAVE: releases the slot and signals connection close.
async fn handle_cmd_leave(session: &mut ClientSession, registry: &ClientRegistry) -> CommandResult {
    session.release(registry).await;

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: None,
    }
}

/// Handles any other line: relays it to everyone who has joined. Lines from
/// a session that has not joined are dropped by the registry.
async fn handle_cmd_message(
    session: &mut ClientSession,
    text: &str,
    registry: &ClientRegistry,
) -> CommandResult {
    let Some(slot) = session.slot() else {
        return released();
    };

    let result = registry.broadcast(slot, text).await;
    if result.delivered == 0 && result.dropped == 0 {
        debug!("Message from {} was not relayed", session.peer());
    }

    CommandResult {
        status: CommandStatus::Success,
        message: None,
    }
}

fn released() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("session already released".into()),
        message: None,
    }
}
