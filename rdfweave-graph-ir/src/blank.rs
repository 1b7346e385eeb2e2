//! Blank node label allocation

use crate::iri::Iri;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hands out blank node labels `b1`, `b2`, ...
///
/// Clones share the same counter, so a graph, its resources and any parser
/// or sink feeding it can all draw from one sequence. Independent
/// allocators produce overlapping labels.
#[derive(Clone, Debug, Default)]
pub struct BlankIdAllocator {
    counter: Arc<AtomicU64>,
}

impl BlankIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next blank node identifier
    pub fn next(&self) -> Iri {
        Iri::blank(self.next_label())
    }

    /// Next blank node label (without `_:`)
    pub fn next_label(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("b{}", n)
    }

    /// Number of labels handed out since creation or the last reset
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// Restart numbering at `b1`
    pub fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }

    /// Check whether two handles share a counter
    pub fn shares_counter(&self, other: &BlankIdAllocator) -> bool {
        Arc::ptr_eq(&self.counter, &other.counter)
    }
}
