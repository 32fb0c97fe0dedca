use std::collections::VecDeque;

pub const MAX_UNDO: usize = 30;

/// Linear undo/redo over full snapshots of some state, usually a canvas.
///
/// The undo side is bounded: pushing onto a full stack evicts the oldest
/// snapshot. Any new push invalidates the redo side.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotHistory<T> {
    capacity: usize,
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
}

impl<T> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::with_capacity(MAX_UNDO)
    }
}

impl<T> SnapshotHistory<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.undo_stack.front()
    }
}

impl<T: Clone> SnapshotHistory<T> {
    pub fn push_undo(&mut self, current: &T) {
        if self.undo_stack.len() >= self.capacity {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(current.clone());
        self.redo_stack.clear();
    }

    /// Restores the most recent snapshot into `current`. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(std::mem::replace(current, previous));
        true
    }

    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        if self.undo_stack.len() >= self.capacity {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(std::mem::replace(current, next));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushes_beyond_capacity_evict_oldest_first() {
        let mut history = SnapshotHistory::with_capacity(3);
        for value in 0..5 {
            history.push_undo(&value);
        }

        assert_eq!(history.undo_len(), 3);
        assert_eq!(history.oldest(), Some(&2));
    }

    #[test]
    fn undo_then_redo_restores_current_state() {
        let mut history = SnapshotHistory::default();
        let mut current = vec![1_u8, 2, 3];
        history.push_undo(&current);
        current.push(4);

        assert!(history.undo(&mut current));
        assert_eq!(current, vec![1, 2, 3]);
        assert!(history.redo(&mut current));
        assert_eq!(current, vec![1, 2, 3, 4]);
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_are_noops() {
        let mut history = SnapshotHistory::<u32>::default();
        let mut current = 7;
        assert!(!history.undo(&mut current));
        assert!(!history.redo(&mut current));
        assert_eq!(current, 7);
    }

    #[test]
    fn new_push_after_undo_clears_redo_stack() {
        let mut history = SnapshotHistory::default();
        let mut current = 0;
        history.push_undo(&current);
        current = 1;
        assert!(history.undo(&mut current));
        assert_eq!(history.redo_len(), 1);

        history.push_undo(&current);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_len(), 1);
    }
}
