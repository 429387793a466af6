//! Error handlers
//!
//! Provides error reporting for failures that end the process.

use crate::error::types::ServerError;
use log::error;

/// Handle a fatal server error
pub fn handle_error(err: &ServerError) {
    error!("Chat relay error: {}", err);
}
