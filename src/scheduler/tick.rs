/*!
 * Tick Loop
 *
 * One call advances simulated time by exactly one unit, in fixed order:
 * admit arrivals, check preemption, dispatch if idle, execute, advance.
 */

use super::Scheduler;
use crate::core::limits::ADMISSION_LEVEL;
use crate::core::types::{Pid, Tick};
use crate::monitoring::KernelEvent;
use crate::process::{ProcessHandle, ProcessState};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Time the tick started at
    pub time: Tick,
    /// Process that held the CPU for this tick
    pub ran: Option<Pid>,
    /// Process that completed at the end of this tick
    pub finished: Option<Pid>,
    pub admitted: Vec<Pid>,
}

impl TickReport {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.ran.is_none()
    }
}

impl Scheduler {
    /// Advance simulated time by one tick
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock;
        let admitted = self.admit_arrivals(now);
        self.check_preemption(now);
        if self.running.is_none() {
            self.dispatch_next(now);
        }
        let (ran, finished) = self.execute(now);
        self.clock += 1;

        TickReport {
            time: now,
            ran,
            finished,
            admitted,
        }
    }

    /// Insert into the pending queue after every arrival `<=` this one
    pub(super) fn enqueue_pending(&mut self, handle: ProcessHandle, arrival: Tick) {
        let table = &self.table;
        let at = self
            .pending
            .partition_point(|h| table.get(*h).map_or(true, |r| r.arrival() <= arrival));
        self.pending.insert(at, handle);
    }

    fn admit_arrivals(&mut self, now: Tick) -> Vec<Pid> {
        let mut admitted = Vec::new();

        while let Some(&handle) = self.pending.front() {
            let Some(record) = self.table.get_mut(handle) else {
                self.pending.pop_front();
                continue;
            };
            if record.arrival() > now {
                break;
            }
            self.pending.pop_front();

            if record.state() != ProcessState::New {
                debug_assert!(false, "pending process {} in state {}", record.pid(), record.state());
                continue;
            }

            record.set_state(ProcessState::Ready);
            record.set_level(ADMISSION_LEVEL);
            let pid = record.pid().clone();
            self.policy.admit(&mut self.ready, handle, ADMISSION_LEVEL);

            debug!(pid = %pid, time = now, "Process admitted");
            self.publish(KernelEvent::Admitted {
                pid: pid.clone(),
                time: now,
            });
            admitted.push(pid);
        }

        admitted
    }

    fn check_preemption(&mut self, now: Tick) {
        let Some(handle) = self.running else {
            return;
        };
        let Some(record) = self.table.get_mut(handle) else {
            return;
        };

        let level = self.policy.clamp_level(record.level());
        if !self.policy.should_preempt(&self.ready, level) {
            return;
        }

        record.set_state(ProcessState::Ready);
        record.reset_slice();
        let pid = record.pid().clone();
        self.trace.close(now);
        self.policy.admit(&mut self.ready, handle, level);
        self.running = None;
        self.counters.preemptions += 1;

        debug!(pid = %pid, time = now, level, "Process preempted");
        self.publish(KernelEvent::Preempted {
            pid,
            time: now,
            level,
        });
    }

    fn dispatch_next(&mut self, now: Tick) {
        while let Some(handle) = self.policy.select_next(&mut self.ready) {
            let Some(record) = self.table.get_mut(handle) else {
                continue;
            };

            // Only READY records are ever enqueued
            if record.state() != ProcessState::Ready {
                debug_assert!(false, "queued process {} in state {}", record.pid(), record.state());
                warn!(pid = %record.pid(), state = %record.state(), "Discarding non-ready queue entry");
                continue;
            }

            record.mark_dispatched(now);
            let pid = record.pid().clone();
            let level = self.policy.clamp_level(record.level());

            self.running = Some(handle);
            self.counters.dispatches += 1;
            if self.last_dispatched != Some(handle) {
                self.counters.context_switches += 1;
            }
            self.last_dispatched = Some(handle);
            self.trace.open(pid.clone(), now);

            debug!(pid = %pid, time = now, level, "Process dispatched");
            self.publish(KernelEvent::Dispatched {
                pid,
                time: now,
                level,
            });
            return;
        }
    }

    fn execute(&mut self, now: Tick) -> (Option<Pid>, Option<Pid>) {
        let Some(handle) = self.running else {
            self.counters.idle_ticks += 1;
            return (None, None);
        };
        let Some(record) = self.table.get_mut(handle) else {
            self.running = None;
            self.counters.idle_ticks += 1;
            return (None, None);
        };

        self.counters.busy_ticks += 1;
        let remaining = record.run_one_tick();
        let pid = record.pid().clone();
        let end = now + 1;

        if remaining == 0 {
            record.mark_finished(end);
            let memory_size = record.memory_size();
            let released = self.ledger.reclaim(record);
            self.trace.close(end);
            self.running = None;
            self.counters.completed += 1;

            info!(pid = %pid, finish = end, "Process finished");
            if !released.is_zero() {
                debug!(pid = %pid, released = %released, "Resources reclaimed");
                self.publish(KernelEvent::ResourcesReclaimed {
                    pid: pid.clone(),
                    time: end,
                    released,
                });
            }
            self.publish(KernelEvent::Finished {
                pid: pid.clone(),
                time: end,
                memory_size,
            });
            return (Some(pid.clone()), Some(pid));
        }

        let level = self.policy.clamp_level(record.level());
        let expired = self
            .policy
            .quantum(level)
            .is_some_and(|quantum| record.slice_used() >= quantum);
        if expired {
            let to_level = self.policy.on_quantum_expired(level);
            // Keep the stored level unless this policy demoted it
            if to_level != level {
                record.set_level(to_level);
            }
            record.set_state(ProcessState::Ready);
            record.reset_slice();
            self.trace.close(end);
            self.policy.admit(&mut self.ready, handle, to_level);
            self.running = None;
            self.counters.quantum_expirations += 1;

            debug!(pid = %pid, time = end, from_level = level, to_level, "Quantum expired");
            self.publish(KernelEvent::QuantumExpired {
                pid: pid.clone(),
                time: end,
                from_level: level,
                to_level,
            });
        }

        (Some(pid), None)
    }
}
