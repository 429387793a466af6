//! Server middleware
//!
//! Provides connection and command logging.

pub mod logging;
