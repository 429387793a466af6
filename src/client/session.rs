//! Client session management
//!
//! Tracks one connection's progress through `Connected -> Active -> Terminated`
//! and owns its registry slot until release.

use std::net::SocketAddr;

use crate::client::{ClientRegistry, SlotId};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Slot reserved, no JOIN yet.
    Connected,
    /// JOIN accepted by the registry.
    Active,
    /// Slot released; the connection is closing.
    Terminated,
}

/// Per-connection session state
pub struct ClientSession {
    peer: SocketAddr,
    slot: Option<SlotId>,
    state: SessionState,
}

impl ClientSession {
    pub fn new(peer: SocketAddr, slot: SlotId) -> Self {
        Self {
            peer,
            slot: Some(slot),
            state: SessionState::Connected,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Slot held by this session, `None` once released.
    pub fn slot(&self) -> Option<SlotId> {
        self.slot
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Marks a successful JOIN.
    pub fn activate(&mut self) {
        if self.state == SessionState::Connected {
            self.state = SessionState::Active;
        }
    }

    /// Releases the slot and terminates the session.
    ///
    /// The slot id is taken out of the session, so the registry sees at most
    /// one leave per occupancy no matter how many exit paths call this.
    pub async fn release(&mut self, registry: &ClientRegistry) -> bool {
        self.state = SessionState::Terminated;
        match self.slot.take() {
            Some(slot) => registry.leave(slot).await,
            None => false,
        }
    }
}
