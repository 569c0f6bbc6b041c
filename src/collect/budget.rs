//! Run- or source-scoped collection budget

use crate::config::BudgetSettings;
use std::sync::Mutex;

/// Decision for one document against the remaining budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetDecision {
    /// Counters were updated; the document may be persisted
    Accepted,

    /// Persisting the document would exceed a cap; counters untouched
    WouldExceed,
}

#[derive(Debug, Default)]
struct Counters {
    bytes_so_far: u64,
    items_so_far: u64,
}

/// Byte and item caps with atomic check-and-update counters
///
/// One instance may be shared by every source in the run (global scope) or
/// created fresh per source. The check and the counter update happen under
/// a single lock, so concurrent sources cannot jointly overrun a cap.
#[derive(Debug)]
pub struct RunBudget {
    target_bytes: u64,
    max_items: u64,
    counters: Mutex<Counters>,
}

impl RunBudget {
    pub fn new(settings: &BudgetSettings) -> Self {
        Self {
            target_bytes: settings.target_bytes,
            max_items: settings.max_items,
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Tries to reserve room for a document of `bytes` bytes
    ///
    /// The overflowing document is the caller's to discard; it is never
    /// truncated to fit.
    pub fn try_accept(&self, bytes: u64) -> BudgetDecision {
        let mut counters = self.counters.lock().unwrap();

        if counters.items_so_far >= self.max_items {
            return BudgetDecision::WouldExceed;
        }
        if counters.bytes_so_far.saturating_add(bytes) > self.target_bytes {
            return BudgetDecision::WouldExceed;
        }

        counters.bytes_so_far += bytes;
        counters.items_so_far += 1;
        BudgetDecision::Accepted
    }

    /// Returns a previously accepted reservation (persistence failed)
    pub fn release(&self, bytes: u64) {
        let mut counters = self.counters.lock().unwrap();
        counters.bytes_so_far = counters.bytes_so_far.saturating_sub(bytes);
        counters.items_so_far = counters.items_so_far.saturating_sub(1);
    }

    /// True when no further document of any size can be accepted
    pub fn exhausted(&self) -> bool {
        let counters = self.counters.lock().unwrap();
        counters.items_so_far >= self.max_items || counters.bytes_so_far >= self.target_bytes
    }

    /// Current `(bytes_so_far, items_so_far)` snapshot
    pub fn snapshot(&self) -> (u64, u64) {
        let counters = self.counters.lock().unwrap();
        (counters.bytes_so_far, counters.items_so_far)
    }
}
