//! Bounded per-project undo/redo store.
//!
//! Snapshots are structural clones of a project's track list; equality is
//! the derived structural comparison, never serialized text. The stack has
//! a fixed capacity: exceeding it silently drops the oldest entry so new
//! edits are never blocked.

use std::collections::VecDeque;

use log::debug;

use crate::data::Track;

/// A captured before-state of one project's tracks.
pub type Snapshot = Vec<Track>;

#[derive(Clone, Debug, Default)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(capacity.min(16)),
            redo: Vec::new(),
            capacity,
        }
    }

    /// Record a before-state. A fresh edit invalidates the redo branch.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
            debug!("undo capacity reached, dropping oldest entry");
        }
        self.undo.push_back(snapshot);
        self.redo.clear();
    }

    /// Step back: returns the snapshot to restore, archiving `current` for
    /// redo. None when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo.pop_back()?;
        self.redo.push(current);
        Some(snapshot)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo.pop()?;
        self.undo.push_back(current);
        Some(snapshot)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
