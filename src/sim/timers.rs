//! Tick-based deferred actions
//!
//! Entries are keyed: scheduling under a pending key replaces the old
//! entry, so a bumper hit twice in quick succession dims once, after the
//! latest hit. Each entry carries the ball generation it was scheduled in.

use serde::{Deserialize, Serialize};

/// A pending action; the key names what to do and to which object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deferred<K> {
    pub due: u64,
    pub key: K,
    pub generation: u64,
}

/// Keyed, cancellable action queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<K> {
    pending: Vec<Deferred<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: PartialEq> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `key` at tick `due`, replacing any entry already under it
    pub fn schedule(&mut self, due: u64, key: K, generation: u64) {
        self.cancel(&key);
        self.pending.push(Deferred {
            due,
            key,
            generation,
        });
    }

    /// Drop the entry under `key`; true if there was one
    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|d| &d.key != key);
        self.pending.len() != before
    }

    /// Remove and return entries due at or before `now`, earliest first
    pub fn drain_due(&mut self, now: u64) -> Vec<Deferred<K>> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|d| d.due <= now);
        self.pending = rest;
        // Stable: equal ticks keep scheduling order
        due.sort_by_key(|d| d.due);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_in_order() {
        let mut timers = Scheduler::new();
        timers.schedule(10, 'b', 0);
        timers.schedule(5, 'a', 0);
        timers.schedule(20, 'c', 0);
        timers.schedule(10, 'd', 0);

        assert!(timers.drain_due(4).is_empty());
        let fired: Vec<char> = timers.drain_due(10).into_iter().map(|d| d.key).collect();
        assert_eq!(fired, vec!['a', 'b', 'd']);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_same_key_replaces() {
        let mut timers = Scheduler::new();
        timers.schedule(6, 3u32, 0);
        timers.schedule(9, 3u32, 1);
        assert_eq!(timers.len(), 1);
        assert!(timers.drain_due(6).is_empty());
        let fired = timers.drain_due(9);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].generation, 1);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Scheduler::new();
        timers.schedule(1, 'x', 0);
        timers.schedule(1, 'y', 0);
        assert!(timers.cancel(&'x'));
        assert!(!timers.cancel(&'x'));
        assert_eq!(timers.len(), 1);
        assert!(timers.cancel(&'y'));
        assert!(timers.is_empty());
    }
}
