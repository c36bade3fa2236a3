/*!
 * Resources Module
 * Deadlock avoidance with the Banker's algorithm
 */

pub mod claim;
pub mod ledger;
pub mod safety;
pub mod vector;

// Re-export for convenience
pub use claim::ResourceClaim;
pub use ledger::ResourceLedger;
pub use safety::{is_safe, safe_sequence, ClaimView};
pub use vector::ResourceVector;
