//! Progress counters shared between the scan worker and the caller.
//!
//! Only the worker writes; the caller reads whenever it likes. Counters are
//! relaxed atomics, so a snapshot may mix values from two adjacent steps.
//! That is fine for display and nothing else should depend on it.

use std::sync::atomic::{AtomicUsize, Ordering};

use sweep_catalog::SourceKind;

#[derive(Debug, Default)]
pub(crate) struct Counters {
    total_locations: AtomicUsize,
    current_location: AtomicUsize,
    current_location_group: AtomicUsize,
    current_location_groups_pending: AtomicUsize,
    found: [AtomicUsize; SourceKind::ALL.len()],
}

impl Counters {
    pub(crate) fn start_pass(&self, total_locations: usize) {
        self.total_locations.store(total_locations, Ordering::Relaxed);
        self.current_location.store(0, Ordering::Relaxed);
        self.start_location(0);
        for found in &self.found {
            found.store(0, Ordering::Relaxed);
        }
    }

    /// Moves on to the next location (1-based) and resets the group counters.
    pub(crate) fn enter_location(&self) {
        self.current_location.fetch_add(1, Ordering::Relaxed);
        self.start_location(0);
    }

    pub(crate) fn start_location(&self, pending: usize) {
        self.current_location_group.store(0, Ordering::Relaxed);
        self.current_location_groups_pending.store(pending, Ordering::Relaxed);
    }

    pub(crate) fn next_group(&self) {
        self.current_location_group.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_pending(&self, pending: usize) {
        self.current_location_groups_pending.store(pending, Ordering::Relaxed);
    }

    pub(crate) fn count_found(&self, kind: SourceKind) {
        self.found[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> Progress {
        Progress {
            total_locations: self.total_locations.load(Ordering::Relaxed),
            current_location: self.current_location.load(Ordering::Relaxed),
            current_location_group: self.current_location_group.load(Ordering::Relaxed),
            current_location_groups_pending: self.current_location_groups_pending.load(Ordering::Relaxed),
            found: std::array::from_fn(|i| self.found[i].load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time copy of the progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total_locations: usize,
    /// 1-based index of the location being scanned; 0 before the first.
    pub current_location: usize,
    /// Number of carriers taken from the current location's queue so far.
    pub current_location_group: usize,
    pub current_location_groups_pending: usize,
    found: [usize; SourceKind::ALL.len()],
}
impl Progress {
    /// Sources of this kind harvested during the pass.
    pub fn found(&self, kind: SourceKind) -> usize {
        self.found[kind.index()]
    }

    pub fn total_found(&self) -> usize {
        self.found.iter().sum()
    }
}
