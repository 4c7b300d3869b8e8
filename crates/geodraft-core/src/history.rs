//! Snapshot-based undo/redo over the document's shape collection.

use crate::document::Document;
use crate::shapes::Shape;
use std::collections::VecDeque;

/// Default number of undo states to keep.
pub const DEFAULT_MAX_UNDO: usize = 60;

/// Undo and redo stacks of full shape snapshots.
///
/// Snapshots only cover the shapes; the view is not part of history.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Vec<Shape>>,
    redo_stack: Vec<Vec<Shape>>,
    max_undo: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO)
    }
}

impl History {
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
        }
    }

    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Record the current shapes before a mutation.
    ///
    /// Evicts the oldest snapshot past the cap and clears the redo stack.
    pub fn snapshot(&mut self, document: &Document) {
        self.undo_stack.push_back(document.shapes().to_vec());
        while self.undo_stack.len() > self.max_undo {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        let current = document.replace_shapes(previous);
        self.redo_stack.push(current);
        true
    }

    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = document.replace_shapes(next);
        self.undo_stack.push_back(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
