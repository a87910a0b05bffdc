//! Ordering for overlapping lookups.
//!
//! A user can fire a second lookup before the first returns. Each lookup
//! takes a ticket when it starts; only the newest ticket's result may be
//! applied, so a slow earlier response can never overwrite a later one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one started lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupTicket(u64);

/// Hands out tickets and decides which completed lookup is current.
///
/// Cheap to clone; clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct LookupSequencer {
    latest: Arc<AtomicU64>,
}

impl LookupSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup, superseding every earlier ticket
    pub fn begin(&self) -> LookupTicket {
        LookupTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `value` through only if `ticket` is still the newest lookup.
    pub fn accept<T>(&self, ticket: LookupTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "Discarding superseded lookup result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins_regardless_of_arrival_order() {
        let seq = LookupSequencer::new();
        let first = seq.begin();
        let second = seq.begin();

        // Second lookup answers first, then the slow first one arrives.
        assert_eq!(seq.accept(second, "second"), Some("second"));
        assert_eq!(seq.accept(first, "first"), None);
    }

    #[test]
    fn test_clones_share_state() {
        let seq = LookupSequencer::new();
        let other = seq.clone();
        let ticket = seq.begin();
        assert!(other.is_current(ticket));
        other.begin();
        assert!(!seq.is_current(ticket));
    }
}
