//! Client management system
//!
//! Holds the shared slot registry, per-connection sessions, and the outbound
//! path every message to a client goes through.

pub mod connection;
pub mod handler;
pub mod registry;
pub mod results;
pub mod session;
pub mod state;

pub use connection::{ConnectionHandle, outbound_channel};
pub use handler::handle_client;
pub use registry::{ClientRegistry, SlotId};
pub use results::FanoutResult;
pub use session::{ClientSession, SessionState};
pub use state::ClientSlot;
