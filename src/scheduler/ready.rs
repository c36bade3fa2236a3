/*!
 * Ready Store
 * FIFO queues of ready processes, one per priority level
 */

use crate::core::types::Level;
use crate::process::ProcessHandle;
use std::collections::VecDeque;

/// Ready queues indexed by level, level 0 first
///
/// FCFS and round-robin use a single level; the feedback queue uses one
/// per configured quantum.
#[derive(Debug, Clone)]
pub struct ReadyStore {
    levels: Vec<VecDeque<ProcessHandle>>,
}

impl ReadyStore {
    /// Store with `levels` queues (at least one)
    pub fn new(levels: usize) -> Self {
        Self {
            levels: vec![VecDeque::new(); levels.max(1)],
        }
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Append at the tail of `level`, clamped to the lowest level
    pub fn push(&mut self, level: Level, handle: ProcessHandle) {
        debug_assert!(!self.contains(handle), "process enqueued twice");
        let level = level.min(self.levels.len() - 1);
        self.levels[level].push_back(handle);
    }

    /// Pop the head of the highest-priority non-empty queue
    pub fn pop_highest(&mut self) -> Option<ProcessHandle> {
        self.levels.iter_mut().find_map(|queue| queue.pop_front())
    }

    /// Whether any queue strictly above `level` has work
    pub fn has_ready_above(&self, level: Level) -> bool {
        self.levels
            .iter()
            .take(level.min(self.levels.len()))
            .any(|queue| !queue.is_empty())
    }

    /// Remove a handle wherever it is queued
    pub fn remove(&mut self, handle: ProcessHandle) -> bool {
        for queue in &mut self.levels {
            if let Some(pos) = queue.iter().position(|h| *h == handle) {
                queue.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn contains(&self, handle: ProcessHandle) -> bool {
        self.levels.iter().any(|queue| queue.contains(&handle))
    }

    /// Queue contents at `level`, head first
    pub fn level(&self, level: Level) -> impl Iterator<Item = ProcessHandle> + '_ {
        self.levels.get(level).into_iter().flatten().copied()
    }

    /// Empty every queue, yielding handles level by level in FIFO order
    pub fn drain(&mut self) -> Vec<ProcessHandle> {
        self.levels.iter_mut().flat_map(|queue| queue.drain(..)).collect()
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(VecDeque::is_empty)
    }
}
