//! State assignments over basic events.
//!
//! An [`Assignment`] maps every basic event to a boolean. Events that were never
//! set are false, so the empty assignment is the "false state" of a fault tree.
//!
//! Assignments are plain values: the constructor derives the assignment of each
//! branch from its parent's with [`Assignment::with`], leaving the parent intact.
//! Sibling branches therefore never observe each other's decisions.

use crate::bitset::BitSet;
use crate::types::GateId;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Assignment {
    true_events: BitSet,
}

impl Assignment {
    /// The assignment where every basic event is false.
    pub fn all_false() -> Self {
        Self::default()
    }

    /// The assignment where exactly the given events are true.
    pub fn from_true(events: impl IntoIterator<Item = GateId>) -> Self {
        Self {
            true_events: events.into_iter().map(|id| id.index()).collect(),
        }
    }

    pub fn get(&self, event: GateId) -> bool {
        self.true_events.contains(event.index())
    }

    pub fn set(&mut self, event: GateId, value: bool) {
        if value {
            self.true_events.insert(event.index());
        } else {
            self.true_events.remove(event.index());
        }
    }

    /// Returns a copy of this assignment with `event` forced to `value`.
    pub fn with(&self, event: GateId, value: bool) -> Self {
        let mut copy = self.clone();
        copy.set(event, value);
        copy
    }

    /// Number of events set to true.
    pub fn count_true(&self) -> usize {
        self.true_events.len()
    }

    /// Iterates over the events set to true, in ascending id order.
    pub fn true_events(&self) -> impl Iterator<Item = GateId> + '_ {
        self.true_events.iter().map(|i| GateId::new(i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_false() {
        let a = Assignment::all_false();
        assert!(!a.get(GateId::new(0)));
        assert!(!a.get(GateId::new(500)));
        assert_eq!(a.count_true(), 0);
    }

    #[test]
    fn test_with_leaves_original_intact() {
        let a = Assignment::from_true([GateId::new(1)]);
        let b = a.with(GateId::new(2), true);
        let c = b.with(GateId::new(1), false);

        assert!(a.get(GateId::new(1)));
        assert!(!a.get(GateId::new(2)));
        assert!(b.get(GateId::new(1)) && b.get(GateId::new(2)));
        assert!(!c.get(GateId::new(1)) && c.get(GateId::new(2)));
        assert_eq!(c.true_events().collect::<Vec<_>>(), vec![GateId::new(2)]);
    }

    #[test]
    fn test_eq() {
        let a = Assignment::all_false().with(GateId::new(3), true).with(GateId::new(3), false);
        assert_eq!(a, Assignment::all_false());
    }
}
