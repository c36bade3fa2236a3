/*!
 * OS Simulation Kernel Library
 *
 * Discrete-time process scheduling core:
 * - Process lifecycle state machine over an arena process table
 * - Pluggable FCFS, round-robin and multi-level feedback queue policies
 * - Banker's-algorithm resource ledger
 * - Execution traces, statistics and a kernel event bus
 */

pub mod config;
pub mod core;
pub mod driver;
pub mod monitoring;
pub mod process;
pub mod resources;
pub mod scheduler;

// Re-exports
pub use config::KernelConfig;
pub use crate::core::errors::{
    KernelError, ProcessError, RejectReason, ResourceError, Result, SchedulerError,
};
pub use crate::core::types::{Level, Pid, Tick, Tid};
pub use driver::{ProcessSpec, Runner, Workload};
pub use monitoring::{init_tracing, KernelEvent};
pub use process::{ProcessHandle, ProcessRecord, ProcessState, ThreadRecord, ThreadStatus};
pub use resources::{ResourceClaim, ResourceVector};
pub use scheduler::{
    Algorithm, ExecutionTrace, ScheduleReport, Scheduler, SchedulerBuilder, SchedulingPolicy,
    Segment, TickReport,
};
