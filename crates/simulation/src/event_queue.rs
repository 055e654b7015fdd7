//! Deterministic event ordering.

use std::collections::BTreeMap;
use treesign_core::Event;
use treesign_types::ParticipantId;

/// Total order over scheduled events.
///
/// Ties at the same instant break by participant, then by scheduling order,
/// so a given schedule always drains identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventKey {
    /// Simulated delivery time in milliseconds.
    pub time_ms: u64,
    /// The participant the event is delivered to.
    pub participant: ParticipantId,
    /// Monotonic tiebreaker assigned at scheduling time.
    pub seq: u64,
}

pub(crate) struct EventQueue {
    events: BTreeMap<EventKey, Event>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, time_ms: u64, participant: ParticipantId, event: Event) -> EventKey {
        let key = EventKey {
            time_ms,
            participant,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.events.insert(key, event);
        key
    }

    pub fn pop_next(&mut self) -> Option<(EventKey, Event)> {
        self.events.pop_first()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
