/*!
 * System Limits and Constants
 *
 * Centralized location for scheduler and resource defaults.
 * Every value here can be overridden through `KernelConfig`.
 */

// =============================================================================
// SCHEDULING
// =============================================================================

/// Round-robin time slice in ticks
pub const DEFAULT_RR_QUANTUM: u32 = 2;

/// Per-level time slices of the feedback queues, highest priority first
/// Level 0 is interactive, each lower level doubles the slice
pub const DEFAULT_MLFQ_QUANTA: [u32; 3] = [1, 2, 4];

/// Upper bound on feedback queue levels accepted from configuration
pub const MAX_MLFQ_LEVELS: usize = 32;

/// Priority level every process is admitted at
pub const ADMISSION_LEVEL: usize = 0;

// =============================================================================
// RESOURCES
// =============================================================================

/// Number of resource classes tracked by the ledger
pub const DEFAULT_RESOURCE_CLASSES: usize = 3;

// =============================================================================
// DRIVER
// =============================================================================

/// Tick budget for run-to-completion before a run is declared runaway
pub const DEFAULT_TICK_BUDGET: u64 = 10_000;
