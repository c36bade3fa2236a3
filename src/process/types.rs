/*!
 * Process Types
 * Lifecycle states and thread records
 */

use crate::core::types::Tid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process state
///
/// `New` is only reachable at creation and `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    /// Created, waiting for its arrival time
    New,
    /// In the ready store, waiting for the CPU
    Ready,
    /// Holding the CPU
    Running,
    /// Waiting on an external wake-up
    Blocked,
    /// Swapped out, never dispatched until activated
    Suspended,
    /// Burst exhausted, resources returned
    Finished,
}

impl ProcessState {
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::Suspended => "SUSPENDED",
            ProcessState::Finished => "FINISHED",
        }
    }

    /// Whether the process can still make progress on its own
    /// (NEW, READY or RUNNING); used by stall detection
    #[inline]
    pub const fn is_progressing(&self) -> bool {
        matches!(
            self,
            ProcessState::New | ProcessState::Ready | ProcessState::Running
        )
    }

    #[inline]
    pub const fn is_finished(&self) -> bool {
        matches!(self, ProcessState::Finished)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread status, mirrors the owning process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    New,
    Ready,
    Running,
    Blocked,
    Suspended,
    Terminated,
}

impl ThreadStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThreadStatus::New => "new",
            ThreadStatus::Ready => "ready",
            ThreadStatus::Running => "running",
            ThreadStatus::Blocked => "blocked",
            ThreadStatus::Suspended => "suspended",
            ThreadStatus::Terminated => "terminated",
        }
    }
}

impl From<ProcessState> for ThreadStatus {
    fn from(state: ProcessState) -> Self {
        match state {
            ProcessState::New => ThreadStatus::New,
            ProcessState::Ready => ThreadStatus::Ready,
            ProcessState::Running => ThreadStatus::Running,
            ProcessState::Blocked => ThreadStatus::Blocked,
            ProcessState::Suspended => ThreadStatus::Suspended,
            ProcessState::Finished => ThreadStatus::Terminated,
        }
    }
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight thread attached to a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub tid: Tid,
    pub status: ThreadStatus,
}
