//! Client registry
//!
//! Fixed-capacity table of client slots shared by every session. A single
//! mutex guards all slot reads and writes and every fan-out traversal, so no
//! operation ever observes a half-updated table. Every operation here only
//! enqueues outbound messages and never awaits network I/O while the lock is
//! held.

use log::{debug, info};
use std::fmt;
use tokio::sync::Mutex;

use crate::client::results::FanoutResult;
use crate::client::state::ClientSlot;
use crate::client::ConnectionHandle;
use crate::error::RegistryError;
use crate::protocol::responses;

/// Stable index of a slot, valid for the lifetime of one occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registry for tracking connected clients
pub struct ClientRegistry {
    slots: Mutex<Vec<ClientSlot>>,
    capacity: usize,
}

impl ClientRegistry {
    /// Creates a registry with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new((0..capacity).map(|_| ClientSlot::default()).collect()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied slots, named or not.
    pub async fn occupied(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Display name held by `slot`, if it has joined.
    pub async fn name_of(&self, slot: SlotId) -> Option<String> {
        let slots = self.slots.lock().await;
        slots
            .get(slot.index())
            .and_then(|entry| entry.name())
            .map(str::to_string)
    }

    /// Claims the first empty slot for a new connection.
    ///
    /// Returns `RegistryError::Full` without touching any slot when every slot
    /// is occupied; the caller is expected to close the connection.
    pub async fn reserve(&self, connection: ConnectionHandle) -> Result<SlotId, RegistryError> {
        let mut slots = self.slots.lock().await;

        let index = slots
            .iter()
            .position(|slot| !slot.is_occupied())
            .ok_or(RegistryError::Full)?;

        let peer = connection.peer();
        slots[index].occupy(connection);
        let slot = SlotId(index);

        info!("Reserved slot {} for {}", slot, peer);
        Ok(slot)
    }

    /// Names the occupant of `slot`, welcomes it and announces it to everyone
    /// else who has joined.
    pub async fn join(&self, slot: SlotId, raw_name: &str) -> Result<FanoutResult, RegistryError> {
        let name = normalize_name(raw_name);
        let mut slots = self.slots.lock().await;

        let entry = slots
            .get_mut(slot.index())
            .filter(|entry| entry.is_occupied())
            .ok_or(RegistryError::UnknownSlot(slot))?;

        if let Some(existing) = entry.name() {
            return Err(RegistryError::AlreadyJoined(existing.to_string()));
        }
        entry.set_name(name.clone());

        let welcome = responses::welcome(&name);
        let announcement = responses::joined(&name);
        let mut result = FanoutResult::default();

        for (index, other) in slots.iter().enumerate() {
            let Some(connection) = other.named_connection() else {
                continue;
            };
            let message = if index == slot.index() {
                &welcome
            } else {
                &announcement
            };
            result.record(connection.deliver(message));
        }

        info!("Slot {} joined as {:?}", slot, name);
        Ok(result)
    }

    /// Snapshot of every joined name in slot order.
    pub async fn who(&self) -> Vec<String> {
        let slots = self.slots.lock().await;
        slots
            .iter()
            .filter_map(|slot| slot.name().map(str::to_string))
            .collect()
    }

    /// Relays `text` from `from` to every joined slot, the sender included.
    ///
    /// Does nothing when the sender has not joined. A recipient whose queue is
    /// full or closed only loses its own copy.
    pub async fn broadcast(&self, from: SlotId, text: &str) -> FanoutResult {
        let slots = self.slots.lock().await;
        let mut result = FanoutResult::default();

        let Some(sender) = slots.get(from.index()).and_then(|slot| slot.name()) else {
            debug!("Dropping message from unjoined slot {}", from);
            return result;
        };
        let message = responses::relay(sender, text);

        for slot in slots.iter() {
            if let Some(connection) = slot.named_connection() {
                result.record(connection.deliver(&message));
            }
        }

        if result.dropped > 0 {
            debug!(
                "Broadcast from {} reached {} recipients, {} dropped",
                from, result.delivered, result.dropped
            );
        }
        result
    }

    /// Clears the name and releases the connection held by `slot`.
    ///
    /// Returns whether a connection was released. Calling it on an empty or
    /// unknown slot leaves the registry untouched.
    pub async fn leave(&self, slot: SlotId) -> bool {
        let mut slots = self.slots.lock().await;

        let Some(entry) = slots.get_mut(slot.index()) else {
            return false;
        };
        let name = entry.name().map(str::to_string);

        match entry.release() {
            Some(connection) => {
                match name {
                    Some(name) => info!("Slot {} ({}) released by {}", slot, name, connection.peer()),
                    None => info!("Slot {} released by {}", slot, connection.peer()),
                }
                true
            }
            None => false,
        }
    }
}

/// Strips leading spaces and tabs and the line terminator from a JOIN argument.
pub fn normalize_name(raw: &str) -> String {
    let name = raw.trim_start_matches([' ', '\t']);
    let name = name.strip_suffix('\n').unwrap_or(name);
    let name = name.strip_suffix('\r').unwrap_or(name);
    name.to_string()
}
