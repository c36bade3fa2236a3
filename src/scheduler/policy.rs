/*!
 * Scheduling Policies
 *
 * The engine is policy-agnostic: it asks the active policy where to admit a
 * process, which process runs next, how long a slice lasts, where a process
 * goes when its slice runs out and whether the running process must yield.
 */

use super::ready::ReadyStore;
use super::types::{validate_quantum, Algorithm};
use crate::core::errors::SchedulerError;
use crate::core::limits::{DEFAULT_MLFQ_QUANTA, DEFAULT_RR_QUANTUM, MAX_MLFQ_LEVELS};
use crate::core::types::Level;
use crate::process::ProcessHandle;
use std::fmt;

/// A scheduling discipline over a `ReadyStore`
pub trait SchedulingPolicy: fmt::Debug + Send {
    fn algorithm(&self) -> Algorithm;

    /// Number of ready queues this policy needs
    fn levels(&self) -> usize {
        1
    }

    /// Time slice at `level`, `None` for run-to-completion
    fn quantum(&self, level: Level) -> Option<u32>;

    /// Level a record with stored level `level` lives at under this policy
    fn clamp_level(&self, level: Level) -> Level {
        level.min(self.levels().saturating_sub(1))
    }

    /// Put a ready process at the tail of its queue
    fn admit(&self, ready: &mut ReadyStore, handle: ProcessHandle, level: Level) {
        ready.push(self.clamp_level(level), handle);
    }

    /// Take the next process to dispatch
    fn select_next(&self, ready: &mut ReadyStore) -> Option<ProcessHandle> {
        ready.pop_highest()
    }

    /// Level after a slice ran out without finishing
    fn on_quantum_expired(&self, level: Level) -> Level {
        level
    }

    /// Whether a process running at `level` must give up the CPU now
    fn should_preempt(&self, _ready: &ReadyStore, _level: Level) -> bool {
        false
    }
}

/// First come, first served
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl SchedulingPolicy for Fcfs {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Fcfs
    }

    fn quantum(&self, _level: Level) -> Option<u32> {
        None
    }
}

/// Round-robin over a single queue
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: u32,
}

impl RoundRobin {
    pub fn new(quantum: u32) -> Result<Self, SchedulerError> {
        Ok(Self {
            quantum: validate_quantum(quantum)?,
        })
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_RR_QUANTUM,
        }
    }
}

impl SchedulingPolicy for RoundRobin {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RoundRobin
    }

    fn quantum(&self, _level: Level) -> Option<u32> {
        Some(self.quantum)
    }
}

/// Multi-level feedback queue
///
/// Processes enter at level 0, drop one level each time they exhaust a
/// slice, and are preempted whenever a strictly higher level has work.
/// Preemption keeps the level; only slice exhaustion demotes.
#[derive(Debug, Clone)]
pub struct Mlfq {
    quanta: Vec<u32>,
}

impl Mlfq {
    /// Feedback queue with one level per entry of `quanta`, highest first
    pub fn new(quanta: Vec<u32>) -> Result<Self, SchedulerError> {
        if quanta.is_empty() || quanta.len() > MAX_MLFQ_LEVELS {
            return Err(SchedulerError::InvalidQuantum(
                format!("feedback queue needs 1..={} levels, got {}", MAX_MLFQ_LEVELS, quanta.len()).into(),
            ));
        }
        for q in &quanta {
            validate_quantum(*q)?;
        }
        Ok(Self { quanta })
    }

    pub fn quanta(&self) -> &[u32] {
        &self.quanta
    }
}

impl Default for Mlfq {
    fn default() -> Self {
        Self {
            quanta: DEFAULT_MLFQ_QUANTA.to_vec(),
        }
    }
}

impl SchedulingPolicy for Mlfq {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Mlfq
    }

    fn levels(&self) -> usize {
        self.quanta.len()
    }

    fn quantum(&self, level: Level) -> Option<u32> {
        Some(self.quanta[self.clamp_level(level)])
    }

    fn on_quantum_expired(&self, level: Level) -> Level {
        self.clamp_level(level.saturating_add(1))
    }

    fn should_preempt(&self, ready: &ReadyStore, level: Level) -> bool {
        ready.has_ready_above(level)
    }
}

/// Build the policy for `algorithm` from the configured slices
pub fn build_policy(
    algorithm: Algorithm,
    rr_quantum: u32,
    mlfq_quanta: &[u32],
) -> Result<Box<dyn SchedulingPolicy>, SchedulerError> {
    Ok(match algorithm {
        Algorithm::Fcfs => Box::new(Fcfs),
        Algorithm::RoundRobin => Box::new(RoundRobin::new(rr_quantum)?),
        Algorithm::Mlfq => Box::new(Mlfq::new(mlfq_quanta.to_vec())?),
    })
}
