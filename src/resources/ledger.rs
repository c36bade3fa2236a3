/*!
 * Resource Ledger
 * System-wide availability with Banker's-algorithm grant / release
 */

use super::safety::{safe_sequence, ClaimView};
use super::vector::ResourceVector;
use crate::core::errors::{ProcessError, ResourceError, Result};
use crate::core::types::Pid;
use crate::process::{ProcessRecord, ProcessState, ProcessTable};
use tracing::{debug, info, warn};

/// Free units per resource class
///
/// Owned by the scheduler; only `set_system_resources`, `try_request`,
/// `release` and completion reclaim change it.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    available: ResourceVector,
}

impl ResourceLedger {
    pub fn new(classes: usize) -> Self {
        Self {
            available: ResourceVector::zeros(classes),
        }
    }

    #[inline]
    pub fn classes(&self) -> usize {
        self.available.classes()
    }

    #[inline]
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// Replace the available vector. Existing claims are not re-validated.
    pub fn set_system_resources(&mut self, available: ResourceVector) -> Result<()> {
        available.ensure_classes(self.classes())?;
        info!(available = %available, "System resources set");
        self.available = available;
        Ok(())
    }

    /// Set a process's maximum claim; `needed` becomes `max − allocated`
    pub fn declare_max(&self, table: &mut ProcessTable, pid: &str, max: ResourceVector) -> Result<()> {
        max.ensure_classes(self.classes())?;
        let record = table
            .by_pid_mut(pid)
            .ok_or_else(|| ProcessError::NotFound(pid.into()))?;

        if record.is_finished() {
            return Err(ProcessError::invalid_state(record.pid(), record.state(), "declare max for").into());
        }

        let allocated = record.claim().allocated().clone();
        if !record.claim_mut().declare_max(max.clone()) {
            return Err(ResourceError::ClaimBelowAllocation {
                pid: pid.into(),
                max,
                allocated,
            }
            .into());
        }

        debug!(pid = %pid, max = %max, "Maximum claim declared");
        Ok(())
    }

    /// Grant `request` to `pid` if it stays within the claim, is available
    /// and leaves the system safe. Rejections never block and leave every
    /// vector untouched.
    pub fn try_request(
        &mut self,
        table: &mut ProcessTable,
        pid: &str,
        request: &ResourceVector,
    ) -> Result<()> {
        request.ensure_classes(self.classes())?;
        let record = table
            .by_pid_mut(pid)
            .ok_or_else(|| ProcessError::NotFound(pid.into()))?;

        if request.is_zero() {
            return Ok(());
        }

        match record.state() {
            ProcessState::New | ProcessState::Suspended | ProcessState::Finished => {
                return Err(ProcessError::invalid_state(record.pid(), record.state(), "request resources for").into());
            }
            _ => {}
        }

        if !request.fits_within(record.claim().needed()) {
            warn!(pid = %pid, requested = %request, needed = %record.claim().needed(), "Request exceeds claim");
            return Err(ResourceError::ExceedsClaim {
                pid: pid.into(),
                requested: request.clone(),
                needed: record.claim().needed().clone(),
            }
            .into());
        }

        if !request.fits_within(&self.available) {
            debug!(pid = %pid, requested = %request, available = %self.available, "Request unavailable");
            return Err(ResourceError::Unavailable {
                pid: pid.into(),
                requested: request.clone(),
                available: self.available.clone(),
            }
            .into());
        }

        // Tentative commit, checked below
        record.claim_mut().grant(request);
        self.available.sub_assign(request);

        if self.safe_order(table).is_some() {
            info!(pid = %pid, granted = %request, available = %self.available, "Request granted");
            return Ok(());
        }

        if let Some(record) = table.by_pid_mut(pid) {
            record.claim_mut().revoke(request);
        }
        self.available.add_assign(request);
        warn!(pid = %pid, requested = %request, "Request would be unsafe, rolled back");

        Err(ResourceError::Unsafe {
            pid: pid.into(),
            requested: request.clone(),
        }
        .into())
    }

    /// Return `amount` from `pid` to the pool, returning what was released
    ///
    /// Releasing more than is held trips a debug assertion and is clamped
    /// to the held amount otherwise.
    pub fn release(
        &mut self,
        table: &mut ProcessTable,
        pid: &str,
        amount: &ResourceVector,
    ) -> Result<ResourceVector> {
        amount.ensure_classes(self.classes())?;
        let record = table
            .by_pid_mut(pid)
            .ok_or_else(|| ProcessError::NotFound(pid.into()))?;

        let released = record.claim_mut().revoke(amount);
        self.available.add_assign(&released);
        debug!(pid = %pid, released = %released, available = %self.available, "Resources released");
        Ok(released)
    }

    /// Take back everything a terminating process holds
    pub(crate) fn reclaim(&mut self, record: &mut ProcessRecord) -> ResourceVector {
        let released = record.claim_mut().revoke_all();
        self.available.add_assign(&released);
        released
    }

    /// Safe completion order over all unfinished processes, by pid
    pub fn safe_sequence(&self, table: &ProcessTable) -> Option<Vec<Pid>> {
        self.safe_order(table)
    }

    fn safe_order(&self, table: &ProcessTable) -> Option<Vec<Pid>> {
        let live: Vec<&ProcessRecord> = table.iter().filter(|r| !r.is_finished()).collect();
        let claims: Vec<ClaimView<'_>> = live
            .iter()
            .map(|r| ClaimView {
                needed: r.claim().needed(),
                allocated: r.claim().allocated(),
            })
            .collect();

        safe_sequence(&self.available, &claims)
            .map(|order| order.into_iter().map(|i| live[i].pid().clone()).collect())
    }
}
