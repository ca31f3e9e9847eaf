//! Bounded undo stack.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::Grid;

/// Most snapshots kept; older ones are dropped.
pub const HISTORY_LIMIT: usize = 20;

/// Board and score as they were just before an accepted move.
///
/// `Grid` is `Copy`, so a snapshot never shares cells with the live board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Record `snapshot` as the most recent entry, evicting the oldest at capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_front(snapshot);
        self.entries.truncate(self.limit);
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_front()
    }

    #[cfg(test)]
    fn peek(&self) -> Option<&Snapshot> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Most recent first.
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}
