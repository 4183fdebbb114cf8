//! # Undo/Redo History
//!
//! Snapshot-based history of the block collection.
//!
//! ## Design
//!
//! - Each mutation records the full pre-mutation snapshot
//! - Undo swaps the current collection with the newest `past` entry and
//!   moves it to the front of `future`
//! - Redo is the mirror image
//! - New mutations clear `future`
//! - `past` is bounded; the oldest entries are evicted first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//!
//! history.push(blocks.clone(), "Move block");
//! // ...mutate blocks...
//!
//! if let Some(previous) = history.undo(blocks.clone()) {
//!     blocks = previous;
//! }
//! ```

use blockforge_common::Block;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One recorded state of the block collection
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub blocks: Vec<Block>,

    /// Description of the transition this entry undoes/redoes
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct History {
    /// Older states, most recent last
    past: VecDeque<HistoryEntry>,

    /// Redoable states, nearest first
    future: VecDeque<HistoryEntry>,

    /// Maximum number of `past` entries (0 = unlimited)
    max_levels: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_levels,
        }
    }

    /// Record a pre-mutation snapshot
    pub fn push(&mut self, snapshot: Vec<Block>, label: impl Into<String>) {
        self.push_past(HistoryEntry {
            blocks: snapshot,
            label: label.into(),
        });

        // New edits invalidate the redo branch
        self.future.clear();
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);

        if self.max_levels > 0 {
            while self.past.len() > self.max_levels {
                self.past.pop_front();
            }
        }
    }

    /// Step back: returns the collection to restore
    pub fn undo(&mut self, current: Vec<Block>) -> Option<Vec<Block>> {
        let entry = self.past.pop_back()?;
        self.future.push_front(HistoryEntry {
            blocks: current,
            label: entry.label.clone(),
        });
        Some(entry.blocks)
    }

    /// Step forward: returns the collection to restore
    pub fn redo(&mut self, current: Vec<Block>) -> Option<Vec<Block>> {
        let entry = self.future.pop_front()?;
        self.push_past(HistoryEntry {
            blocks: current,
            label: entry.label.clone(),
        });
        Some(entry.blocks)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.past.back().map(|entry| entry.label.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.future.front().map(|entry| entry.label.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
