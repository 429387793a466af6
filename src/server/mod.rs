//! Server core functionality
//!
//! This module contains the listener and the accept loop that hands each
//! admitted connection to its own session task.

pub mod core;

pub use self::core::Server;
