/*!
 * Core Types
 * Common types used across the kernel
 */

use super::data_structures::InlineString;

/// Process identifier as supplied by the shell ("P1", "init", ...)
pub type Pid = InlineString;

/// Discrete simulation time, one unit per tick
pub type Tick = u64;

/// Priority level of the feedback queues (0 is the highest)
pub type Level = usize;

/// Thread identifier, unique within its owning process
pub type Tid = u32;
