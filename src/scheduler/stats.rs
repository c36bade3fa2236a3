/*!
 * Scheduler Statistics
 * Counters and per-policy turnaround analysis
 */

use super::types::Algorithm;
use super::Scheduler;
use crate::core::types::{Pid, Tick};
use crate::process::ProcessRecord;
use serde::Serialize;

/// Event counters, updated by the tick loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerCounters {
    pub dispatches: u64,
    /// Dispatches of a process other than the previous one
    pub context_switches: u64,
    pub preemptions: u64,
    pub quantum_expirations: u64,
    pub completed: u64,
    pub busy_ticks: u64,
    pub idle_ticks: u64,
}

/// Timing of one finished process
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: u64,
    pub start: Tick,
    pub finish: Tick,
    pub turnaround: u64,
    pub weighted_turnaround: f64,
    pub waiting: u64,
    pub response: u64,
}

impl ProcessMetrics {
    fn from_record(record: &ProcessRecord) -> Option<Self> {
        Some(Self {
            pid: record.pid().clone(),
            arrival: record.arrival(),
            burst: record.burst(),
            start: record.start()?,
            finish: record.finish()?,
            turnaround: record.turnaround()?,
            weighted_turnaround: record.weighted_turnaround()?,
            waiting: record.waiting_time()?,
            response: record.response_time()?,
        })
    }
}

/// Read-only summary of a run
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub algorithm: Algorithm,
    pub time: Tick,
    pub finished: usize,
    pub unfinished: usize,
    pub average_turnaround: Option<f64>,
    pub average_weighted_turnaround: Option<f64>,
    pub average_waiting: Option<f64>,
    pub average_response: Option<f64>,
    pub counters: SchedulerCounters,
    /// Finished processes in completion order
    pub processes: Vec<ProcessMetrics>,
}

impl ScheduleReport {
    /// Pids in the order they finished
    pub fn completion_order(&self) -> Vec<&str> {
        self.processes.iter().map(|m| m.pid.as_str()).collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

impl Scheduler {
    /// Event counters so far
    pub fn counters(&self) -> &SchedulerCounters {
        &self.counters
    }

    /// mean(finish − arrival) over finished processes
    pub fn average_turnaround(&self) -> Option<f64> {
        mean(self.table.iter().filter_map(|r| r.turnaround()).map(|t| t as f64))
    }

    /// mean((finish − arrival) / burst) over finished processes
    pub fn average_weighted_turnaround(&self) -> Option<f64> {
        mean(self.table.iter().filter_map(ProcessRecord::weighted_turnaround))
    }

    /// Full summary; touches no process state
    pub fn report(&self) -> ScheduleReport {
        let mut processes: Vec<ProcessMetrics> =
            self.table.iter().filter_map(ProcessMetrics::from_record).collect();
        // Stable: equal finish times keep creation order
        processes.sort_by_key(|m| m.finish);

        let finished = processes.len();
        ScheduleReport {
            algorithm: self.algorithm(),
            time: self.clock,
            finished,
            unfinished: self.table.len() - finished,
            average_turnaround: mean(processes.iter().map(|m| m.turnaround as f64)),
            average_weighted_turnaround: mean(processes.iter().map(|m| m.weighted_turnaround)),
            average_waiting: mean(processes.iter().map(|m| m.waiting as f64)),
            average_response: mean(processes.iter().map(|m| m.response as f64)),
            counters: self.counters.clone(),
            processes,
        }
    }
}
