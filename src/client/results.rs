//! Client result types
//!
//! Defines result structures returned by registry operations.

/// Outcome of one fan-out traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutResult {
    /// Messages queued for a recipient.
    pub delivered: usize,
    /// Messages dropped because a recipient's queue was full or closed.
    pub dropped: usize,
}

impl FanoutResult {
    pub(crate) fn record(&mut self, delivered: bool) {
        if delivered {
            self.delivered += 1;
        } else {
            self.dropped += 1;
        }
    }
}
