//! # Undo/Redo History
//!
//! Snapshot-based history over the whole page tree.
//!
//! ## Design
//!
//! - Every undoable edit records the complete tree that resulted from it
//! - Snapshots are `Arc` roots, so consecutive snapshots share all subtrees
//!   the edit did not touch
//! - Undo/redo only move a cursor; nothing is recomputed
//! - Recording after an undo discards the redo branch
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//! history.load(initial_tree);
//!
//! history.record(next_tree);
//!
//! let previous = history.undo();
//! let next = history.redo();
//! ```

use funnel_document::Element;
use std::sync::Arc;

/// Snapshot history with a cursor at the active snapshot
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots, oldest first
    snapshots: Vec<Arc<Element>>,

    /// Index of the active snapshot
    current_index: usize,

    /// Maximum number of snapshots kept (0 = unlimited)
    max_levels: usize,
}

impl History {
    /// Create an empty history with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an empty history with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            current_index: 0,
            max_levels,
        }
    }

    /// Replace the whole history with a single loaded snapshot
    pub fn load(&mut self, tree: Arc<Element>) {
        self.snapshots.clear();
        self.snapshots.push(tree);
        self.current_index = 0;
    }

    /// Record a new snapshot after the active one, dropping any redo branch
    pub fn record(&mut self, tree: Arc<Element>) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.current_index + 1);
        }
        self.snapshots.push(tree);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.snapshots.len() > self.max_levels {
            let excess = self.snapshots.len() - self.max_levels;
            self.snapshots.drain(..excess);
        }

        self.current_index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. `None` when already at the oldest one.
    pub fn undo(&mut self) -> Option<Arc<Element>> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        self.current()
    }

    /// Step forward one snapshot. `None` when already at the newest one.
    pub fn redo(&mut self) -> Option<Arc<Element>> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        self.current()
    }

    /// The active snapshot, if any has been recorded
    pub fn current(&self) -> Option<Arc<Element>> {
        self.snapshots.get(self.current_index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.snapshots.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Number of snapshots held
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Arc<Element>] {
        &self.snapshots
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
