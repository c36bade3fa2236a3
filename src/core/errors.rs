/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::data_structures::InlineString;
use crate::core::types::{Pid, Tick};
use crate::process::ProcessState;
use crate::resources::ResourceVector;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have been reaped or never existed. Check the PID.")
    )]
    NotFound(Pid),

    #[error("Process {0} already exists")]
    #[diagnostic(
        code(process::already_exists),
        help("PIDs must be unique. Choose another identifier.")
    )]
    AlreadyExists(Pid),

    #[error("Cannot {operation} process {pid} in state {state}")]
    #[diagnostic(
        code(process::invalid_state),
        help("Operation cannot be performed in the current process state.")
    )]
    InvalidState {
        pid: Pid,
        state: ProcessState,
        operation: InlineString,
    },

    #[error("Invalid argument: {0}")]
    #[diagnostic(code(process::invalid_argument))]
    InvalidArgument(InlineString),
}

impl ProcessError {
    pub(crate) fn invalid_state(pid: &Pid, state: ProcessState, operation: &str) -> Self {
        ProcessError::InvalidState {
            pid: pid.clone(),
            state,
            operation: operation.into(),
        }
    }
}

/// Why a resource request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Request goes beyond the declared maximum claim
    ExceedsClaim,
    /// Not enough free resources right now, retry later
    Unavailable,
    /// Granting would leave the system in an unsafe state, retry later
    Unsafe,
}

impl RejectReason {
    /// Whether retrying the same request later can succeed
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, RejectReason::ExceedsClaim)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RejectReason::ExceedsClaim => "exceeds_claim",
            RejectReason::Unavailable => "unavailable",
            RejectReason::Unsafe => "unsafe",
        }
    }
}

/// Resource ledger errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ResourceError {
    #[error("Process {pid} requested {requested} which exceeds its remaining claim {needed}")]
    #[diagnostic(
        code(resources::exceeds_claim),
        help("Declare a larger maximum claim or request less.")
    )]
    ExceedsClaim {
        pid: Pid,
        requested: ResourceVector,
        needed: ResourceVector,
    },

    #[error("Process {pid} requested {requested} but only {available} is available")]
    #[diagnostic(
        code(resources::unavailable),
        help("Resources are held by other processes. Retry after they release.")
    )]
    Unavailable {
        pid: Pid,
        requested: ResourceVector,
        available: ResourceVector,
    },

    #[error("Granting {requested} to process {pid} would leave the system unsafe")]
    #[diagnostic(
        code(resources::unsafe_state),
        help("The request was rolled back. Retry after other processes complete.")
    )]
    Unsafe { pid: Pid, requested: ResourceVector },

    #[error("Resource vector has {actual} classes, ledger tracks {expected}")]
    #[diagnostic(code(resources::dimension_mismatch))]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Maximum claim {max} of process {pid} is below its allocation {allocated}")]
    #[diagnostic(
        code(resources::claim_below_allocation),
        help("Release resources before lowering the claim.")
    )]
    ClaimBelowAllocation {
        pid: Pid,
        max: ResourceVector,
        allocated: ResourceVector,
    },
}

impl ResourceError {
    /// Rejection reason for policy violations, `None` for malformed calls
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ResourceError::ExceedsClaim { .. } => Some(RejectReason::ExceedsClaim),
            ResourceError::Unavailable { .. } => Some(RejectReason::Unavailable),
            ResourceError::Unsafe { .. } => Some(RejectReason::Unsafe),
            ResourceError::DimensionMismatch { .. }
            | ResourceError::ClaimBelowAllocation { .. } => None,
        }
    }
}

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Invalid scheduling algorithm: {0}")]
    #[diagnostic(
        code(scheduler::invalid_algorithm),
        help("Use fcfs, rr or mlfq.")
    )]
    InvalidAlgorithm(InlineString),

    #[error("Invalid quantum: {0}")]
    #[diagnostic(
        code(scheduler::invalid_quantum),
        help("Quanta are counted in ticks and must be at least 1.")
    )]
    InvalidQuantum(InlineString),

    #[error("No process is running")]
    #[diagnostic(
        code(scheduler::no_running_process),
        help("Only the running process can block itself. Tick until a process is dispatched.")
    )]
    NoRunningProcess,
}

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Resource error: {0}")]
    #[diagnostic(transparent)]
    Resource(#[from] ResourceError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(kernel::configuration_error),
        help("Invalid configuration. Review configuration parameters.")
    )]
    Configuration(InlineString),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(kernel::io_error),
        help("Reading the workload or configuration file failed.")
    )]
    Io(InlineString),

    #[error("Stalled at t={time}: {unfinished} unfinished process(es) but none can make progress")]
    #[diagnostic(
        code(kernel::stalled),
        help("Every remaining process is blocked or suspended. Wake or activate one of them.")
    )]
    Stalled { time: Tick, unfinished: usize },

    #[error("Tick budget of {budget} exhausted before all processes finished")]
    #[diagnostic(
        code(kernel::budget_exhausted),
        help("Increase tick_budget or check for runaway workloads.")
    )]
    BudgetExhausted { budget: u64 },
}

impl From<std::io::Error> for KernelError {
    fn from(err: std::io::Error) -> Self {
        KernelError::Io(err.to_string().into())
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        KernelError::Configuration(err.to_string().into())
    }
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;
