/*!
 * Scheduler Types
 * Algorithm selection and quantum validation
 */

use crate::core::errors::SchedulerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// First come, first served; runs to completion
    Fcfs,
    /// Round-robin with a fixed quantum
    RoundRobin,
    /// Multi-level feedback queue with demotion on quantum exhaustion
    Mlfq,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Fcfs, Algorithm::RoundRobin, Algorithm::Mlfq];

    /// Convert to string representation
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::RoundRobin => "rr",
            Self::Mlfq => "mlfq",
        }
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcfs" | "fifo" | "first_come_first_served" => Ok(Self::Fcfs),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "mlfq" | "feedback" | "multilevel_feedback" => Ok(Self::Mlfq),
            other => Err(SchedulerError::InvalidAlgorithm(other.into())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Algorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Validate a time slice in ticks
#[inline]
pub fn validate_quantum(quantum: u32) -> Result<u32, SchedulerError> {
    if quantum == 0 {
        Err(SchedulerError::InvalidQuantum(
            "quantum must be at least 1 tick".into(),
        ))
    } else {
        Ok(quantum)
    }
}
