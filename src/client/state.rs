//! Module `state`
//!
//! Defines `ClientSlot`, one entry of the client registry.

use crate::client::ConnectionHandle;

/// One fixed-index entry in the client registry.
///
/// A slot is occupied while it holds a connection handle and named once the
/// connection has joined. A named slot is always occupied.
#[derive(Debug, Default)]
pub struct ClientSlot {
    connection: Option<ConnectionHandle>,
    name: Option<String>,
}

impl ClientSlot {
    // --------------------
    // Getter methods
    // --------------------

    /// Returns whether a connection currently holds this slot.
    pub fn is_occupied(&self) -> bool {
        self.connection.is_some()
    }

    /// Returns the display name if the occupant has joined.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the connection of a named slot; `None` for empty or reserved slots.
    pub fn named_connection(&self) -> Option<&ConnectionHandle> {
        self.name.as_ref().and(self.connection.as_ref())
    }

    // --------------------
    // Lifecycle
    // --------------------

    /// empty -> reserved
    pub(crate) fn occupy(&mut self, connection: ConnectionHandle) {
        self.connection = Some(connection);
        self.name = None;
    }

    /// reserved -> named
    pub(crate) fn set_name(&mut self, name: String) {
        debug_assert!(self.is_occupied());
        self.name = Some(name);
    }

    /// named/reserved -> empty. Returns the released handle, if any.
    pub(crate) fn release(&mut self) -> Option<ConnectionHandle> {
        self.name = None;
        self.connection.take()
    }
}
