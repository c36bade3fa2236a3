/*!
 * Workload Driver
 *
 * Loads process workloads from JSON and drives a scheduler to completion
 * under a tick budget, aborting when the run stalls.
 *
 * ```json
 * {
 *   "config": { "algorithm": "rr", "rr_quantum": 2, "system_resources": [10, 5, 7] },
 *   "processes": [
 *     { "pid": "P1", "arrival": 0, "burst": 5, "memory": 64, "max_claim": [7, 5, 3] }
 *   ]
 * }
 * ```
 */

use crate::config::KernelConfig;
use crate::core::errors::{KernelError, Result};
use crate::core::types::{Pid, Tick};
use crate::resources::ResourceVector;
use crate::scheduler::{Algorithm, Scheduler, TickReport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// One process to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessSpec {
    pub pid: Pid,
    pub arrival: Tick,
    pub burst: u64,
    #[serde(default, skip_serializing_if = "crate::core::serde::is_zero_usize")]
    pub memory: usize,
    #[serde(default, skip_serializing_if = "crate::core::serde::is_none")]
    pub max_claim: Option<ResourceVector>,
}

impl ProcessSpec {
    pub fn new(pid: impl Into<Pid>, arrival: Tick, burst: u64) -> Self {
        Self {
            pid: pid.into(),
            arrival,
            burst,
            memory: 0,
            max_claim: None,
        }
    }
}

/// Processes plus the configuration to run them under
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workload {
    #[serde(default)]
    pub config: KernelConfig,
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    /// Three staggered processes used when no workload file is given
    pub fn demo() -> Self {
        Self {
            config: KernelConfig::default(),
            processes: vec![
                ProcessSpec::new("P1", 0, 5),
                ProcessSpec::new("P2", 2, 3),
                ProcessSpec::new("P3", 4, 1),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let workload: Self = serde_json::from_str(json)?;
        workload.config.validate()?;
        Ok(workload)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let workload = Self::from_json_str(&json)?;
        info!(path = %path.display(), processes = workload.processes.len(), "Workload loaded");
        Ok(workload)
    }

    /// Build a scheduler for this workload under `algorithm`, processes created
    pub fn scheduler(&self, algorithm: Algorithm) -> Result<Scheduler> {
        let config = KernelConfig {
            algorithm,
            ..self.config.clone()
        };
        let mut scheduler = Scheduler::builder().with_config(config).build()?;
        self.load_into(&mut scheduler)?;
        Ok(scheduler)
    }

    /// Create every process (and declare its claim) in `scheduler`
    pub fn load_into(&self, scheduler: &mut Scheduler) -> Result<()> {
        for spec in &self.processes {
            scheduler.create_process(spec.pid.clone(), spec.arrival, spec.burst, spec.memory)?;
            if let Some(ref max) = spec.max_claim {
                scheduler.declare_max(&spec.pid, max.clone())?;
            }
        }
        Ok(())
    }
}

/// Drives a scheduler with a stall watchdog and a tick budget
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    budget: u64,
}

impl Runner {
    pub fn new(budget: u64) -> Self {
        Self { budget }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.tick_budget)
    }

    #[inline]
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Tick until every process finishes, returning the ticks taken
    ///
    /// Fails with `Stalled` when unfinished processes remain but none is
    /// NEW, READY or RUNNING, and with `BudgetExhausted` after `budget` ticks.
    pub fn run_to_completion(&self, scheduler: &mut Scheduler) -> Result<u64> {
        self.run_with(scheduler, |_, _| {})
    }

    /// `run_to_completion`, calling `on_tick` after every tick
    pub fn run_with(
        &self,
        scheduler: &mut Scheduler,
        mut on_tick: impl FnMut(&Scheduler, &TickReport),
    ) -> Result<u64> {
        let mut ticks = 0;
        loop {
            if scheduler.is_all_finished() {
                info!(time = scheduler.time(), ticks, "All processes finished");
                return Ok(ticks);
            }
            if scheduler.is_stalled() {
                let unfinished = scheduler.all_processes().filter(|r| !r.is_finished()).count();
                warn!(time = scheduler.time(), unfinished, "Run stalled");
                return Err(KernelError::Stalled {
                    time: scheduler.time(),
                    unfinished,
                });
            }
            if ticks >= self.budget {
                warn!(budget = self.budget, "Tick budget exhausted");
                return Err(KernelError::BudgetExhausted { budget: self.budget });
            }

            let report = scheduler.tick();
            ticks += 1;
            debug!(time = report.time, ran = ?report.ran, "Tick");
            on_tick(scheduler, &report);
        }
    }

    /// Run exactly `n` ticks, regardless of state
    pub fn step_n(&self, scheduler: &mut Scheduler, n: u64) -> Vec<TickReport> {
        (0..n).map(|_| scheduler.tick()).collect()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::from_config(&KernelConfig::default())
    }
}
