//! Per-player undo/redo history

use std::collections::VecDeque;

use super::ChangeQueue;

/// One applied change: the queue that reverses it and the queue that
/// re-applies it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub undo: Box<dyn ChangeQueue>,
    pub redo: Box<dyn ChangeQueue>,
}

impl HistoryEntry {
    pub fn new(undo: Box<dyn ChangeQueue>, redo: Box<dyn ChangeQueue>) -> Self {
        Self { undo, redo }
    }
}

/// Bounded undo stack with a cursor.
///
/// Entries before the cursor are applied, entries at or after it have been
/// undone. Undo and redo only move the cursor and enqueue work; the world is
/// changed later by the scheduler.
#[derive(Debug, Clone)]
pub struct UndoQueue {
    entries: VecDeque<HistoryEntry>,
    /// Number of applied entries
    cursor: usize,
    depth: usize,
}

impl UndoQueue {
    /// Create a history holding at most `depth` entries
    pub fn new(depth: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(depth.min(64)),
            cursor: 0,
            depth,
        }
    }

    /// Record a newly applied change. Drops anything undone and evicts the
    /// oldest entry past the depth limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        while self.entries.len() > self.depth {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    /// Undo up to `n` changes, appending their inverse queues to `pending`.
    /// Returns the number actually undone.
    pub fn undo(&mut self, n: usize, pending: &mut VecDeque<Box<dyn ChangeQueue>>) -> usize {
        let mut count = 0;
        while count < n && self.cursor > 0 {
            self.cursor -= 1;
            let mut queue = self.entries[self.cursor].undo.boxed_clone();
            queue.reset();
            pending.push_back(queue);
            count += 1;
        }
        count
    }

    /// Redo up to `n` undone changes. Returns the number re-applied.
    pub fn redo(&mut self, n: usize, pending: &mut VecDeque<Box<dyn ChangeQueue>>) -> usize {
        let mut count = 0;
        while count < n && self.cursor < self.entries.len() {
            let mut queue = self.entries[self.cursor].redo.boxed_clone();
            queue.reset();
            pending.push_back(queue);
            self.cursor += 1;
            count += 1;
        }
        count
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries available to undo
    pub fn undoable(&self) -> usize {
        self.cursor
    }

    /// Entries available to redo
    pub fn redoable(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use crate::material::Material;
    use crate::queue::{ExecutionState, ShapeChangeQueue};
    use crate::shape::{MaterialShape, Shape};

    fn entry(id: u16) -> HistoryEntry {
        let shape = Shape::filled(1, 1, 1, IVec3::ZERO);
        let queue = |m| -> Box<dyn ChangeQueue> {
            Box::new(ShapeChangeQueue::new("alice", "w", IVec3::ZERO, MaterialShape::uniform(shape.clone(), m)))
        };
        HistoryEntry::new(queue(Material::AIR), queue(Material::new(id)))
    }

    #[test]
    fn test_push_and_undo() {
        let mut history = UndoQueue::new(5);
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.undoable(), 2);

        let mut pending = VecDeque::new();
        assert_eq!(history.undo(1, &mut pending), 1);
        assert_eq!(pending.len(), 1);
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.redoable(), 1);
    }

    #[test]
    fn test_undo_bounded_by_depth() {
        let mut history = UndoQueue::new(3);
        for id in 1..=5 {
            history.push(entry(id));
        }
        assert_eq!(history.len(), 3);

        let mut pending = VecDeque::new();
        assert_eq!(history.undo(10, &mut pending), 3);
        assert_eq!(history.undo(1, &mut pending), 0);
        assert_eq!(pending.len(), 3);
    }

    #[test]
    fn test_undo_then_redo_restores_cursor() {
        let mut history = UndoQueue::new(10);
        for id in 1..=4 {
            history.push(entry(id));
        }
        let before = history.cursor();
        let mut pending = VecDeque::new();

        let undone = history.undo(3, &mut pending);
        let redone = history.redo(3, &mut pending);
        assert_eq!(undone, 3);
        assert_eq!(redone, 3);
        assert_eq!(history.cursor(), before);
        assert_eq!(pending.len(), 6);
    }

    #[test]
    fn test_push_discards_redo_side() {
        let mut history = UndoQueue::new(10);
        history.push(entry(1));
        history.push(entry(2));
        let mut pending = VecDeque::new();
        history.undo(1, &mut pending);

        history.push(entry(3));
        assert_eq!(history.len(), 2);
        assert_eq!(history.redoable(), 0);
        assert_eq!(history.redo(1, &mut pending), 0);
    }

    #[test]
    fn test_requeued_entries_are_reset() {
        let mut history = UndoQueue::new(2);
        history.push(entry(1));
        let mut pending = VecDeque::new();
        history.undo(1, &mut pending);
        assert_eq!(pending[0].state(), ExecutionState::Unstarted);
    }

    #[test]
    fn test_zero_depth_keeps_nothing() {
        let mut history = UndoQueue::new(0);
        history.push(entry(1));
        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
    }
}
