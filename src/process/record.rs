/*!
 * Process Control Block
 * Identity, timing, scheduling metadata, resource claim and threads
 */

use super::types::{ProcessState, ThreadRecord, ThreadStatus};
use crate::core::types::{Level, Pid, Tick, Tid};
use crate::resources::ResourceClaim;
use serde::Serialize;

/// One process as seen by the scheduler and the ledger
///
/// Read access is public; every mutation goes through the scheduler so that
/// state changes and container membership move together.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRecord {
    pid: Pid,
    arrival: Tick,
    burst: u64,
    remaining: u64,
    start: Option<Tick>,
    finish: Option<Tick>,
    level: Level,
    state: ProcessState,
    slice_used: u32,
    claim: ResourceClaim,
    threads: Vec<ThreadRecord>,
    next_tid: Tid,
    memory_size: usize,
}

impl ProcessRecord {
    /// New record in state NEW with one thread
    pub(crate) fn new(
        pid: Pid,
        arrival: Tick,
        burst: u64,
        memory_size: usize,
        resource_classes: usize,
    ) -> Self {
        let mut record = Self {
            pid,
            arrival,
            burst,
            remaining: burst,
            start: None,
            finish: None,
            level: 0,
            state: ProcessState::New,
            slice_used: 0,
            claim: ResourceClaim::new(resource_classes),
            threads: Vec::with_capacity(1),
            next_tid: 0,
            memory_size,
        };
        record.add_thread();
        record
    }

    #[inline]
    pub fn pid(&self) -> &Pid {
        &self.pid
    }

    #[inline]
    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    #[inline]
    pub fn burst(&self) -> u64 {
        self.burst
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// First dispatch time, `None` until dispatched
    #[inline]
    pub fn start(&self) -> Option<Tick> {
        self.start
    }

    /// Completion time, `None` until finished
    #[inline]
    pub fn finish(&self) -> Option<Tick> {
        self.finish
    }

    /// Feedback queue level (0 is the highest priority)
    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Ticks consumed in the current time slice
    #[inline]
    pub fn slice_used(&self) -> u32 {
        self.slice_used
    }

    #[inline]
    pub fn claim(&self) -> &ResourceClaim {
        &self.claim
    }

    #[inline]
    pub fn threads(&self) -> &[ThreadRecord] {
        &self.threads
    }

    /// Memory hint for the memory-manager collaborator
    #[inline]
    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// finish − arrival
    pub fn turnaround(&self) -> Option<u64> {
        self.finish.map(|f| f.saturating_sub(self.arrival))
    }

    /// (finish − arrival) / burst
    pub fn weighted_turnaround(&self) -> Option<f64> {
        self.turnaround().map(|t| t as f64 / self.burst as f64)
    }

    /// Time spent ready but not running: turnaround − burst
    pub fn waiting_time(&self) -> Option<u64> {
        self.turnaround().map(|t| t.saturating_sub(self.burst))
    }

    /// Delay before first dispatch: start − arrival
    pub fn response_time(&self) -> Option<u64> {
        self.start.map(|s| s.saturating_sub(self.arrival))
    }

    // ------------------------------------------------------------------
    // Mutation, crate-internal
    // ------------------------------------------------------------------

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
        let status = ThreadStatus::from(state);
        for thread in &mut self.threads {
            thread.status = status;
        }
    }

    pub(crate) fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub(crate) fn mark_dispatched(&mut self, now: Tick) {
        if self.start.is_none() {
            self.start = Some(now);
        }
        self.slice_used = 0;
        self.set_state(ProcessState::Running);
    }

    /// Run one tick, returning the remaining burst
    pub(crate) fn run_one_tick(&mut self) -> u64 {
        self.remaining = self.remaining.saturating_sub(1);
        self.slice_used = self.slice_used.saturating_add(1);
        self.remaining
    }

    pub(crate) fn reset_slice(&mut self) {
        self.slice_used = 0;
    }

    pub(crate) fn mark_finished(&mut self, at: Tick) {
        self.finish = Some(at);
        self.set_state(ProcessState::Finished);
    }

    pub(crate) fn claim_mut(&mut self) -> &mut ResourceClaim {
        &mut self.claim
    }

    pub(crate) fn add_thread(&mut self) -> Tid {
        let tid = self.next_tid;
        self.next_tid += 1;
        self.threads.push(ThreadRecord {
            tid,
            status: ThreadStatus::from(self.state),
        });
        tid
    }
}
