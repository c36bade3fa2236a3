/*!
 * Resource Operations
 * Banker's-algorithm entry points, publishing grant and rejection events
 */

use super::Scheduler;
use crate::core::errors::{KernelError, Result, SchedulerError};
use crate::core::types::Pid;
use crate::monitoring::KernelEvent;
use crate::resources::ResourceVector;

impl Scheduler {
    /// Replace the available vector; existing claims are not re-validated
    pub fn set_system_resources(&mut self, available: impl Into<ResourceVector>) -> Result<()> {
        self.ledger.set_system_resources(available.into())
    }

    /// Set the maximum claim of `pid`
    pub fn declare_max(&mut self, pid: &str, max: impl Into<ResourceVector>) -> Result<()> {
        self.ledger.declare_max(&mut self.table, pid, max.into())
    }

    /// Grant `request` to `pid` or reject it without side effects
    pub fn try_request(&mut self, pid: &str, request: impl Into<ResourceVector>) -> Result<()> {
        let request = request.into();
        let outcome = self.ledger.try_request(&mut self.table, pid, &request);

        match &outcome {
            Ok(()) if !request.is_zero() => self.publish(KernelEvent::ResourcesGranted {
                pid: pid.into(),
                time: self.clock,
                granted: request,
            }),
            Err(KernelError::Resource(err)) => {
                if let Some(reason) = err.reason() {
                    self.publish(KernelEvent::RequestRejected {
                        pid: pid.into(),
                        time: self.clock,
                        reason,
                    });
                }
            }
            _ => {}
        }
        outcome
    }

    /// `try_request` on behalf of the running process, returning its pid
    pub fn request_for_running(&mut self, request: impl Into<ResourceVector>) -> Result<Pid> {
        let pid = self
            .running_process()
            .map(|record| record.pid().clone())
            .ok_or(SchedulerError::NoRunningProcess)?;
        self.try_request(&pid, request)?;
        Ok(pid)
    }

    /// Return `amount` from `pid` to the pool
    pub fn release(&mut self, pid: &str, amount: impl Into<ResourceVector>) -> Result<ResourceVector> {
        let released = self.ledger.release(&mut self.table, pid, &amount.into())?;
        if !released.is_zero() {
            self.publish(KernelEvent::ResourcesReleased {
                pid: pid.into(),
                time: self.clock,
                released: released.clone(),
            });
        }
        Ok(released)
    }

    /// Completion order the safety check finds now, `None` if unsafe
    pub fn safe_sequence(&self) -> Option<Vec<Pid>> {
        self.ledger.safe_sequence(&self.table)
    }
}
