//! Bounded memory of surfaced candidates.
//!
//! `record_choice` arrives as a separate, later call carrying only a
//! candidate id. The cache keeps each surfaced candidate together with the
//! intent it was synthesized for until it is evicted in insertion order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use synth_types::{Candidate, CandidateId, EncodedIntent, UserId};

/// A surfaced candidate and the context it was produced in.
#[derive(Debug, Clone)]
pub struct CachedCandidate {
    pub candidate: Candidate,
    pub intent: EncodedIntent,
    pub user_id: Option<UserId>,
}

#[derive(Default)]
struct Slots {
    entries: HashMap<CandidateId, CachedCandidate>,
    order: VecDeque<CandidateId>,
}

pub struct CandidateCache {
    capacity: usize,
    slots: Mutex<Slots>,
}

impl CandidateCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Mutex::new(Slots::default()),
        }
    }

    pub fn insert(&self, entry: CachedCandidate) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let id = entry.candidate.id.clone();
        if slots.entries.insert(id.clone(), entry).is_none() {
            slots.order.push_back(id);
        }
        while slots.order.len() > self.capacity {
            if let Some(evicted) = slots.order.pop_front() {
                slots.entries.remove(&evicted);
            }
        }
    }

    pub fn get(&self, id: &CandidateId) -> Option<CachedCandidate> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entries.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
