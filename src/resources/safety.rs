/*!
 * Banker's Safety Check
 *
 * Simulates completion of every live process against a work vector. A state
 * is safe when some completion order exists in which each process's
 * remaining need fits within what is free plus what earlier finishers return.
 */

use super::vector::ResourceVector;

/// Need and allocation of one process, in process-creation order
#[derive(Debug, Clone, Copy)]
pub struct ClaimView<'a> {
    pub needed: &'a ResourceVector,
    pub allocated: &'a ResourceVector,
}

/// Find a safe completion order, returning indices into `claims`
///
/// Scans in input order and restarts from the front after every match, so
/// the result is deterministic for a given creation order.
pub fn safe_sequence(available: &ResourceVector, claims: &[ClaimView<'_>]) -> Option<Vec<usize>> {
    let mut work = available.clone();
    let mut finished = vec![false; claims.len()];
    let mut order = Vec::with_capacity(claims.len());

    'scan: while order.len() < claims.len() {
        for (i, claim) in claims.iter().enumerate() {
            if !finished[i] && claim.needed.fits_within(&work) {
                work.add_assign(claim.allocated);
                finished[i] = true;
                order.push(i);
                continue 'scan;
            }
        }
        return None;
    }

    Some(order)
}

/// Whether a safe completion order exists
#[inline]
pub fn is_safe(available: &ResourceVector, claims: &[ClaimView<'_>]) -> bool {
    safe_sequence(available, claims).is_some()
}
