//! Interaction ledger
//!
//! Remembers which interactions have already been claimed so a redelivered
//! or racing event is answered once. Bounded; the oldest IDs are evicted first.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Default number of interaction IDs remembered
pub const DEFAULT_LEDGER_CAPACITY: usize = 1024;

#[derive(Default)]
struct LedgerInner {
    seen: HashSet<u64>,
    order: VecDeque<u64>,
}

/// Set of claimed interaction IDs
pub struct InteractionLedger {
    inner: Mutex<LedgerInner>,
    capacity: usize,
}

impl InteractionLedger {
    /// Create a ledger with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LEDGER_CAPACITY)
    }

    /// Create a ledger remembering at most `capacity` IDs
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(LedgerInner::default()),
            capacity: capacity.max(1),
        }
    }

    /// Claim an interaction. Returns `false` if it was already claimed.
    pub fn claim(&self, interaction_id: u64) -> bool {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if !inner.seen.insert(interaction_id) {
            return false;
        }
        inner.order.push_back(interaction_id);

        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.seen.remove(&oldest);
            }
        }
        true
    }

    /// Number of remembered IDs
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .order
            .len()
    }

    /// Whether nothing has been claimed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InteractionLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let ledger = InteractionLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.claim(1));
        assert!(!ledger.claim(1));
        assert!(ledger.claim(2));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_evicts_oldest() {
        let ledger = InteractionLedger::with_capacity(2);
        assert!(ledger.claim(1));
        assert!(ledger.claim(2));
        assert!(ledger.claim(3));
        assert_eq!(ledger.len(), 2);

        // 1 was evicted, 3 is still remembered
        assert!(!ledger.claim(3));
        assert!(ledger.claim(1));
    }
}
