/*!
 * Scheduler Module
 *
 * Discrete-time process scheduler with a Banker's-algorithm resource ledger.
 * One `tick()` is one unit of simulated time: admission, preemption check,
 * dispatch, execution, then the clock advances.
 */

mod builder;
mod lifecycle;
pub mod policy;
pub mod ready;
mod resources;
pub mod stats;
mod tick;
pub mod trace;
pub mod types;

pub use builder::SchedulerBuilder;
pub use policy::{build_policy, Fcfs, Mlfq, RoundRobin, SchedulingPolicy};
pub use ready::ReadyStore;
pub use stats::{ProcessMetrics, ScheduleReport, SchedulerCounters};
pub use tick::TickReport;
pub use trace::{ExecutionTrace, Segment};
pub use types::{validate_quantum, Algorithm};

use crate::core::limits::{DEFAULT_MLFQ_QUANTA, DEFAULT_RESOURCE_CLASSES, DEFAULT_RR_QUANTUM};
use crate::core::types::{Pid, Tick};
use crate::monitoring::{EventBus, KernelEvent};
use crate::process::{ProcessHandle, ProcessRecord, ProcessTable};
use crate::resources::{ResourceLedger, ResourceVector};
use std::collections::VecDeque;

/// Scheduling engine and owner of all process and resource state
///
/// Single owner, no interior locking: lifecycle calls must not overlap a
/// `tick()`. Every operation that moves a process between containers
/// changes its state in the same call.
#[derive(Debug)]
pub struct Scheduler {
    clock: Tick,
    table: ProcessTable,
    // Not yet admitted, sorted by arrival; ties keep creation order
    pending: VecDeque<ProcessHandle>,
    ready: ReadyStore,
    running: Option<ProcessHandle>,
    last_dispatched: Option<ProcessHandle>,
    policy: Box<dyn SchedulingPolicy>,
    rr_quantum: u32,
    mlfq_quanta: Vec<u32>,
    ledger: ResourceLedger,
    counters: SchedulerCounters,
    trace: ExecutionTrace,
    events: EventBus,
}

impl Scheduler {
    /// Scheduler with default slices, resource classes and no resources
    pub fn new(algorithm: Algorithm) -> Self {
        let policy: Box<dyn SchedulingPolicy> = match algorithm {
            Algorithm::Fcfs => Box::new(Fcfs),
            Algorithm::RoundRobin => Box::new(RoundRobin::default()),
            Algorithm::Mlfq => Box::new(Mlfq::default()),
        };
        Self::from_parts(
            policy,
            DEFAULT_RR_QUANTUM,
            DEFAULT_MLFQ_QUANTA.to_vec(),
            ResourceLedger::new(DEFAULT_RESOURCE_CLASSES),
        )
    }

    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub(crate) fn from_parts(
        policy: Box<dyn SchedulingPolicy>,
        rr_quantum: u32,
        mlfq_quanta: Vec<u32>,
        ledger: ResourceLedger,
    ) -> Self {
        Self {
            clock: 0,
            table: ProcessTable::new(),
            pending: VecDeque::new(),
            ready: ReadyStore::new(policy.levels()),
            running: None,
            last_dispatched: None,
            policy,
            rr_quantum,
            mlfq_quanta,
            ledger,
            counters: SchedulerCounters::default(),
            trace: ExecutionTrace::new(),
            events: EventBus::new(),
        }
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    /// Current simulated time
    #[inline]
    pub fn time(&self) -> Tick {
        self.clock
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.policy.algorithm()
    }

    /// Process holding the CPU, if any
    pub fn running_process(&self) -> Option<&ProcessRecord> {
        self.running.and_then(|h| self.table.get(h))
    }

    pub fn process(&self, pid: &str) -> Option<&ProcessRecord> {
        self.table.by_pid(pid)
    }

    /// Every process in creation order
    pub fn all_processes(&self) -> impl Iterator<Item = &ProcessRecord> + '_ {
        self.table.iter()
    }

    pub fn ready_store(&self) -> &ReadyStore {
        &self.ready
    }

    /// Pids queued at `level`, head first
    pub fn ready_pids(&self, level: usize) -> Vec<Pid> {
        self.ready
            .level(level)
            .filter_map(|h| self.table.get(h))
            .map(|r| r.pid().clone())
            .collect()
    }

    pub fn available_resources(&self) -> &ResourceVector {
        self.ledger.available()
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    /// True when every process has finished (or none exist)
    pub fn is_all_finished(&self) -> bool {
        self.table.iter().all(ProcessRecord::is_finished)
    }

    /// Some process is unfinished but none is NEW, READY or RUNNING
    pub fn is_stalled(&self) -> bool {
        !self.is_all_finished() && !self.table.iter().any(|r| r.state().is_progressing())
    }

    /// Receive every kernel event from now on
    pub fn subscribe(&mut self) -> flume::Receiver<KernelEvent> {
        self.events.subscribe()
    }

    fn publish(&mut self, event: KernelEvent) {
        self.events.publish(event);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Algorithm::Fcfs)
    }
}
