//! Per-location work list.
//!
//! The queue starts out as the statically configured carriers of one
//! location, in order. Carriers learned from a network table jump the queue
//! and displace every pending carrier that is loosely the same, so a carrier
//! whose true parameters are known is never tuned through a stale
//! representation.

use std::collections::VecDeque;

use sweep_catalog::{Carrier, Equivalence, Match, equivalence};

#[derive(Debug, Default)]
pub struct WorkQueue {
    pending: VecDeque<Carrier>,
    nit_eligible: Vec<Carrier>,
    done: Vec<Carrier>,
    yielded: Vec<Carrier>,
}

impl WorkQueue {
    /// Seeds the queue; every seeded carrier may trigger network table
    /// discovery.
    pub fn new(carriers: impl IntoIterator<Item = Carrier>) -> Self {
        let pending: VecDeque<Carrier> = carriers.into_iter().collect();
        let nit_eligible = pending.iter().cloned().collect();
        Self { pending, nit_eligible, ..Default::default() }
    }

    pub fn dequeue_next(&mut self) -> Option<Carrier> {
        self.pending.pop_front()
    }

    pub fn mark_done(&mut self, carrier: &Carrier) {
        if !equivalence::contains(&self.done, carrier, Match::Exact) {
            self.done.push(carrier.clone());
        }
    }

    /// Whether an equivalent carrier was already visited in this location.
    pub fn already_done(&self, carrier: &Carrier) -> bool {
        equivalence::contains(&self.done, carrier, Match::Loose)
    }

    /// Queues a carrier announced by a network table ahead of the static
    /// backlog, dropping any pending or eligible equivalent of it.
    pub fn insert_discovered(&mut self, carrier: Carrier) {
        self.remove_equivalent(&carrier);
        self.pending.push_front(carrier);
    }

    /// Cancels pending work and network table eligibility for every carrier
    /// loosely matching `carrier`.
    pub fn remove_equivalent(&mut self, carrier: &Carrier) {
        self.pending.retain(|c| !c.loosely(carrier));
        self.nit_eligible.retain(|c| !c.loosely(carrier));
    }

    /// Only carriers seeded from the static configuration, in their exact
    /// configured form, may trigger network table discovery.
    pub fn is_nit_eligible(&self, carrier: &Carrier) -> bool {
        equivalence::contains(&self.nit_eligible, carrier, Match::Exact)
    }

    /// Remembers that `carrier` delivered group metadata.
    pub fn record_metadata(&mut self, carrier: &Carrier) {
        self.yielded.push(carrier.clone());
    }

    pub fn has_yielded_equivalent(&self, carrier: &Carrier) -> bool {
        equivalence::contains(&self.yielded, carrier, Match::Loose)
    }

    /// Number of carriers still pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
