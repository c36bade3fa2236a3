/*!
 * Lifecycle Operations
 *
 * Creation, swap out / swap in, block / wake, thread attach, reaping and
 * policy switches. Called between ticks; each call moves a process between
 * containers and changes its state in one step.
 */

use super::policy::{build_policy, SchedulingPolicy};
use super::ready::ReadyStore;
use super::types::Algorithm;
use super::Scheduler;
use crate::core::errors::{ProcessError, Result, SchedulerError};
use crate::core::types::{Pid, Tid};
use crate::monitoring::KernelEvent;
use crate::process::{ProcessHandle, ProcessRecord, ProcessState};
use tracing::{debug, info};

impl Scheduler {
    /// Register a process; it stays NEW until the clock reaches `arrival`
    ///
    /// An arrival already in the past is admitted on the next tick.
    pub fn create_process(
        &mut self,
        pid: impl Into<Pid>,
        arrival: u64,
        burst: u64,
        memory_size: usize,
    ) -> Result<ProcessHandle> {
        let pid = pid.into();
        if pid.is_empty() {
            return Err(ProcessError::InvalidArgument("process id must not be empty".into()).into());
        }
        if burst == 0 {
            return Err(ProcessError::InvalidArgument(
                format!("process {} needs a burst of at least 1 tick", pid).into(),
            )
            .into());
        }

        let record = ProcessRecord::new(pid.clone(), arrival, burst, memory_size, self.ledger.classes());
        let handle = self
            .table
            .insert(record)
            .ok_or_else(|| ProcessError::AlreadyExists(pid.clone()))?;
        self.enqueue_pending(handle, arrival);

        info!(pid = %pid, arrival, burst, memory_size, "Process created");
        self.publish(KernelEvent::Created {
            pid,
            time: self.clock,
            arrival,
        });
        Ok(handle)
    }

    /// Swap a READY or BLOCKED process out
    pub fn suspend(&mut self, pid: &str) -> Result<()> {
        let handle = self.handle_or_not_found(pid)?;
        let Some(record) = self.table.get_mut(handle) else {
            return Err(ProcessError::NotFound(pid.into()).into());
        };

        match record.state() {
            ProcessState::Ready => {
                self.ready.remove(handle);
            }
            ProcessState::Blocked => {}
            state => {
                return Err(ProcessError::invalid_state(record.pid(), state, "suspend").into());
            }
        }
        record.set_state(ProcessState::Suspended);

        info!(pid = %pid, time = self.clock, "Process suspended");
        self.publish(KernelEvent::Suspended {
            pid: pid.into(),
            time: self.clock,
        });
        Ok(())
    }

    /// Swap a SUSPENDED process back in at its own level
    pub fn activate(&mut self, pid: &str) -> Result<()> {
        self.make_ready(pid, ProcessState::Suspended, "activate")?;

        info!(pid = %pid, time = self.clock, "Process activated");
        self.publish(KernelEvent::Activated {
            pid: pid.into(),
            time: self.clock,
        });
        Ok(())
    }

    /// Move the running process to BLOCKED, freeing the CPU
    pub fn block_current(&mut self) -> Result<Pid> {
        let handle = self.running.ok_or(SchedulerError::NoRunningProcess)?;
        let Some(record) = self.table.get_mut(handle) else {
            self.running = None;
            return Err(SchedulerError::NoRunningProcess.into());
        };

        record.set_state(ProcessState::Blocked);
        record.reset_slice();
        let pid = record.pid().clone();
        self.trace.close(self.clock);
        self.running = None;

        info!(pid = %pid, time = self.clock, "Process blocked");
        self.publish(KernelEvent::Blocked {
            pid: pid.clone(),
            time: self.clock,
        });
        Ok(pid)
    }

    /// Make a BLOCKED process READY at its own level
    pub fn wake(&mut self, pid: &str) -> Result<()> {
        self.make_ready(pid, ProcessState::Blocked, "wake")?;

        info!(pid = %pid, time = self.clock, "Process woken");
        self.publish(KernelEvent::Woken {
            pid: pid.into(),
            time: self.clock,
        });
        Ok(())
    }

    /// Attach another thread to a live process
    pub fn create_thread(&mut self, pid: &str) -> Result<Tid> {
        let record = self
            .table
            .by_pid_mut(pid)
            .ok_or_else(|| ProcessError::NotFound(pid.into()))?;
        if record.is_finished() {
            return Err(ProcessError::invalid_state(record.pid(), record.state(), "create thread in").into());
        }

        let tid = record.add_thread();
        debug!(pid = %pid, tid, "Thread created");
        self.publish(KernelEvent::ThreadCreated {
            pid: pid.into(),
            time: self.clock,
            tid,
        });
        Ok(tid)
    }

    /// Remove a FINISHED process from the table, returning its record
    ///
    /// Outstanding handles to it stop resolving.
    pub fn reap(&mut self, pid: &str) -> Result<ProcessRecord> {
        let handle = self.handle_or_not_found(pid)?;
        if let Some(record) = self.table.get(handle) {
            if !record.is_finished() {
                return Err(ProcessError::invalid_state(record.pid(), record.state(), "reap").into());
            }
        }
        let record = self
            .table
            .remove(handle)
            .ok_or_else(|| ProcessError::NotFound(pid.into()))?;
        if self.last_dispatched == Some(handle) {
            self.last_dispatched = None;
        }

        debug!(pid = %pid, "Process reaped");
        self.publish(KernelEvent::Reaped {
            pid: pid.into(),
            time: self.clock,
        });
        Ok(record)
    }

    /// Switch to `algorithm`, using the configured slices
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<()> {
        let policy = build_policy(algorithm, self.rr_quantum, &self.mlfq_quanta)?;
        self.set_policy(policy);
        Ok(())
    }

    /// Install a policy, reshaping the ready store
    ///
    /// Queued processes keep their FIFO order and are queued at their stored
    /// level clamped to the new level count; the stored level itself is kept
    /// so a later switch back restores it. The running process keeps the CPU
    /// with a fresh slice.
    pub fn set_policy(&mut self, policy: Box<dyn SchedulingPolicy>) {
        let queued = self.ready.drain();
        self.ready = ReadyStore::new(policy.levels());

        for handle in queued {
            if let Some(record) = self.table.get(handle) {
                policy.admit(&mut self.ready, handle, record.level());
            }
        }
        if let Some(record) = self.running.and_then(|h| self.table.get_mut(h)) {
            record.reset_slice();
        }

        let algorithm = policy.algorithm();
        self.policy = policy;

        info!(algorithm = %algorithm, time = self.clock, "Scheduling algorithm changed");
        self.publish(KernelEvent::AlgorithmChanged {
            time: self.clock,
            algorithm,
        });
    }

    fn handle_or_not_found(&self, pid: &str) -> Result<ProcessHandle> {
        self.table
            .handle_of(pid)
            .ok_or_else(|| ProcessError::NotFound(pid.into()).into())
    }

    /// `expected` → READY, enqueued at the record's own level
    fn make_ready(&mut self, pid: &str, expected: ProcessState, operation: &str) -> Result<()> {
        let handle = self.handle_or_not_found(pid)?;
        let Some(record) = self.table.get_mut(handle) else {
            return Err(ProcessError::NotFound(pid.into()).into());
        };
        if record.state() != expected {
            return Err(ProcessError::invalid_state(record.pid(), record.state(), operation).into());
        }

        let level = record.level();
        record.set_state(ProcessState::Ready);
        self.policy.admit(&mut self.ready, handle, level);
        Ok(())
    }
}
