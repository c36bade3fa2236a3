/*!
 * Resource Claims
 * Per-process maximum / allocated / needed bookkeeping
 */

use super::vector::ResourceVector;
use serde::{Deserialize, Serialize};
use tracing::error;

/// A process's standing with the ledger
///
/// `allocated + needed == max` holds for every class after every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceClaim {
    max: ResourceVector,
    allocated: ResourceVector,
    needed: ResourceVector,
}

impl ResourceClaim {
    pub fn new(classes: usize) -> Self {
        Self {
            max: ResourceVector::zeros(classes),
            allocated: ResourceVector::zeros(classes),
            needed: ResourceVector::zeros(classes),
        }
    }

    #[inline]
    pub fn max(&self) -> &ResourceVector {
        &self.max
    }

    #[inline]
    pub fn allocated(&self) -> &ResourceVector {
        &self.allocated
    }

    #[inline]
    pub fn needed(&self) -> &ResourceVector {
        &self.needed
    }

    /// Whether any unit of any class is held
    pub fn holds_any(&self) -> bool {
        !self.allocated.is_zero()
    }

    /// Replace the maximum claim. Fails if it would drop below the allocation.
    pub(crate) fn declare_max(&mut self, max: ResourceVector) -> bool {
        match max.checked_sub(&self.allocated) {
            Some(needed) => {
                self.max = max;
                self.needed = needed;
                true
            }
            None => false,
        }
    }

    /// Move `request` from needed to allocated. Caller checked `request <= needed`.
    pub(crate) fn grant(&mut self, request: &ResourceVector) {
        self.allocated.add_assign(request);
        self.needed.sub_assign(request);
    }

    /// Move up to `amount` from allocated back to needed, returning what was released
    ///
    /// Releasing more than is held is a caller bug: it trips a debug assertion
    /// and is clamped to the held amount in release builds.
    pub(crate) fn revoke(&mut self, amount: &ResourceVector) -> ResourceVector {
        if !amount.fits_within(&self.allocated) {
            error!(
                held = %self.allocated,
                requested = %amount,
                "over-release clamped to held amount"
            );
            debug_assert!(
                false,
                "over-release: {} requested, {} held",
                amount, self.allocated
            );
        }
        let released = amount.min(&self.allocated);
        self.allocated.sub_assign(&released);
        self.needed.add_assign(&released);
        released
    }

    /// Release the whole allocation, returning it
    pub(crate) fn revoke_all(&mut self) -> ResourceVector {
        let released = self.allocated.clone();
        self.revoke(&released)
    }

    /// `allocated[i] + needed[i] == max[i]` for every class
    pub fn is_consistent(&self) -> bool {
        self.max.classes() == self.allocated.classes()
            && self.max.classes() == self.needed.classes()
            && self
                .max
                .as_slice()
                .iter()
                .zip(self.allocated.as_slice())
                .zip(self.needed.as_slice())
                .all(|((m, a), n)| u64::from(*a) + u64::from(*n) == u64::from(*m))
    }
}
