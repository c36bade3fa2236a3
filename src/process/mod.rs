/*!
 * Process Module
 * Process control blocks and the table that owns them
 */

pub mod record;
pub mod table;
pub mod types;

// Re-export for convenience
pub use record::ProcessRecord;
pub use table::{ProcessHandle, ProcessTable};
pub use types::{ProcessState, ThreadRecord, ThreadStatus};
