//! Score tracking
//!
//! `ScoreBoard` holds the running score for the current ball and the best
//! score seen so far. The best score is persisted through a
//! [`HighScoreStore`] backend; a backend that fails to read starts the
//! table at zero instead of surfacing the error.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Persistence backend for a single high-score value
pub trait HighScoreStore {
    fn load(&self) -> Result<u32, StorageError>;
    fn save(&mut self, high_score: u32) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same cell, so a test can keep a
/// handle and observe what the table persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(high_score: u32) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(high_score))),
        }
    }

    /// Last persisted value
    pub fn stored(&self) -> Option<u32> {
        self.value.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StorageError> {
        Ok(self.value.get().unwrap_or(0))
    }

    fn save(&mut self, high_score: u32) -> Result<(), StorageError> {
        self.value.set(Some(high_score));
        Ok(())
    }
}

/// Result of a score update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub current: u32,
    pub high: u32,
    /// The high score moved and should be persisted
    pub new_high: bool,
}

/// Current score and session high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    current: u32,
    high: u32,
}

impl ScoreBoard {
    /// Start from a known high score
    pub fn new(high: u32) -> Self {
        Self { current: 0, high }
    }

    /// Read the persisted high score; any backend failure yields 0
    pub fn load(store: &dyn HighScoreStore) -> Self {
        match store.load() {
            Ok(high) => {
                log::info!("Loaded high score {}", high);
                Self::new(high)
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting at 0", e);
                Self::new(0)
            }
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    /// Set the current score, raising the high score if it was beaten
    pub fn update(&mut self, score: u32) -> ScoreUpdate {
        self.current = score;
        let new_high = score > self.high;
        if new_high {
            self.high = score;
        }
        ScoreUpdate {
            current: self.current,
            high: self.high,
            new_high,
        }
    }

    /// Add points to the current score
    pub fn award(&mut self, points: u32) -> ScoreUpdate {
        self.update(self.current.saturating_add(points))
    }

    /// New ball: current score back to zero
    pub fn reset(&mut self) -> ScoreUpdate {
        self.update(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, StorageError> {
            Err(StorageError::Unavailable("security error".into()))
        }

        fn save(&mut self, _high_score: u32) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("security error".into()))
        }
    }

    #[test]
    fn test_failed_read_starts_at_zero() {
        let board = ScoreBoard::load(&BrokenStore);
        assert_eq!(board.high(), 0);
        assert_eq!(board.current(), 0);
    }

    #[test]
    fn test_load_uses_stored_value() {
        let store = MemoryStore::with_value(120);
        let board = ScoreBoard::load(&store);
        assert_eq!(board.high(), 120);
    }

    #[test]
    fn test_update_raises_high_score() {
        let mut board = ScoreBoard::new(15);
        let update = board.award(10);
        assert_eq!(update.current, 10);
        assert!(!update.new_high);

        let update = board.award(10);
        assert_eq!(update.current, 20);
        assert_eq!(update.high, 20);
        assert!(update.new_high);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut board = ScoreBoard::new(0);
        board.award(10);
        board.award(10);
        let update = board.reset();
        assert_eq!(update.current, 0);
        assert_eq!(update.high, 20);
        assert!(!update.new_high);
    }

    #[test]
    fn test_memory_store_clones_share_value() {
        let observer = MemoryStore::new();
        let mut store = observer.clone();
        assert_eq!(observer.stored(), None);
        store.save(40).unwrap();
        assert_eq!(observer.stored(), Some(40));
        assert_eq!(observer.load().unwrap(), 40);
    }

    proptest! {
        #[test]
        fn prop_high_never_below_current(
            start in 0u32..1000,
            updates in proptest::collection::vec(0u32..5000, 0..50),
        ) {
            let mut board = ScoreBoard::new(start);
            for n in updates {
                let update = board.update(n);
                prop_assert!(update.high >= update.current);
                prop_assert!(board.high() >= board.current());
                prop_assert_eq!(board.current(), n);
            }
        }
    }
}
