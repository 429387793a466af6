//! Module `commands`
//!
//! Classifies protocol lines into chat commands and defines the result type
//! command handlers return.
//!
//! Matching is case-sensitive and prefix-based, tried in the order JOIN, WHO,
//! LEAVE; anything else is a chat message. Prefix matching means `JOINT`
//! is read as `JOIN` with the argument `T`, same as the wire protocol always
//! did. WHO is the exception and must stand alone, so `WHOA` is a message.

/// A parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `JOIN <name>`; holds the raw remainder after `JOIN`.
    Join(String),
    Who,
    Leave,
    /// Any other line, terminator stripped.
    Message(String),
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
pub struct CommandResult {
    pub status: CommandStatus,
    /// Reply for the requesting client only.
    pub message: Option<String>,
}

/// Parses one line received from a client. The line terminator may be present.
pub fn parse_command(line: &str) -> Command {
    if let Some(rest) = line.strip_prefix("JOIN") {
        return Command::Join(rest.to_string());
    }

    if line
        .strip_prefix("WHO")
        .is_some_and(|rest| rest.trim().is_empty())
    {
        return Command::Who;
    }

    if line.starts_with("LEAVE") {
        return Command::Leave;
    }

    Command::Message(strip_line_terminator(line).to_string())
}

/// Removes a trailing `\n` or `\r\n`.
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
