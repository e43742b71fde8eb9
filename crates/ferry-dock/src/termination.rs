//! Round-trip completion counting.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts vehicles that have completed both legs.
///
/// Never blocks; safe to query from any thread at any time.  The count only
/// ever increases.
#[derive(Debug)]
pub struct TerminationDetector {
    total:     usize,
    completed: AtomicUsize,
}

impl TerminationDetector {
    pub fn new(total: usize) -> Self {
        Self { total, completed: AtomicUsize::new(0) }
    }

    /// Record one completed round trip.  Returns the new count.
    pub fn report(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// `true` once every vehicle has completed its round trip.
    pub fn all_done(&self) -> bool {
        self.completed() >= self.total
    }
}
