//! Undo/Redo History
//!
//! Snapshot stack where the last entry of `past` is the present state.
//! Snapshots of a [`crate::models::Drawer`] are two `Arc`s each, so keeping
//! a long history costs almost nothing.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: Vec<T>,
    limit: usize,
}

impl<T: Clone> History<T> {
    /// `limit` counts past states, present included (minimum 1)
    pub fn new(initial: T, limit: usize) -> Self {
        let mut past = VecDeque::new();
        past.push_back(initial);
        Self {
            past,
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn present(&self) -> &T {
        // Never empty: constructed with one entry and undo keeps the last
        &self.past[self.past.len() - 1]
    }

    /// Record a committed state; clears the redo stack
    pub fn push(&mut self, state: T) {
        self.past.push_back(state);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        let current = self.past.pop_back()?;
        self.future.push(current);
        Some(self.present())
    }

    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        self.past.push_back(next);
        Some(self.present())
    }

    /// Forget everything but `state`
    pub fn reset(&mut self, state: T) {
        self.past.clear();
        self.past.push_back(state);
        self.future.clear();
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo() {
        let mut h = History::new(0, 10);
        assert!(!h.can_undo());
        h.push(1);
        h.push(2);
        assert_eq!(*h.present(), 2);
        assert_eq!(h.undo(), Some(&1));
        assert_eq!(h.undo(), Some(&0));
        assert_eq!(h.undo(), None);
        assert_eq!(*h.present(), 0);
        assert_eq!(h.redo(), Some(&1));
        assert!(h.can_redo());
        assert_eq!(h.redo(), Some(&2));
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn test_push_clears_future() {
        let mut h = History::new("a", 10);
        h.push("b");
        h.undo();
        h.push("c");
        assert!(!h.can_redo());
        assert_eq!(h.undo(), Some(&"a"));
    }

    #[test]
    fn test_limit_keeps_present() {
        let mut h = History::new(0, 3);
        for i in 1..10 {
            h.push(i);
        }
        assert_eq!(h.past_len(), 3);
        assert_eq!(h.undo(), Some(&8));
        assert_eq!(h.undo(), Some(&7));
        assert_eq!(h.undo(), None);

        let mut single = History::new(0, 0);
        single.push(1);
        assert_eq!(*single.present(), 1);
        assert!(!single.can_undo());
    }
}
