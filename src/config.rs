/*!
 * Kernel Configuration
 *
 * Defaults, overlaid by a JSON file, overlaid by environment variables:
 * - KERNEL_ALGORITHM: fcfs | rr | mlfq
 * - KERNEL_RR_QUANTUM: round-robin slice in ticks
 * - KERNEL_MLFQ_QUANTA: comma-separated per-level slices, e.g. "1,2,4"
 * - KERNEL_TICK_BUDGET: run-to-completion tick limit
 */

use crate::core::errors::{KernelError, Result};
use crate::core::limits::{
    DEFAULT_MLFQ_QUANTA, DEFAULT_RESOURCE_CLASSES, DEFAULT_RR_QUANTUM, DEFAULT_TICK_BUDGET,
};
use crate::resources::ResourceVector;
use crate::scheduler::policy::{Mlfq, RoundRobin};
use crate::scheduler::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub algorithm: Algorithm,
    pub rr_quantum: u32,
    pub mlfq_quanta: Vec<u32>,
    pub resource_classes: usize,
    #[serde(skip_serializing_if = "crate::core::serde::is_none")]
    pub system_resources: Option<ResourceVector>,
    pub tick_budget: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Fcfs,
            rr_quantum: DEFAULT_RR_QUANTUM,
            mlfq_quanta: DEFAULT_MLFQ_QUANTA.to_vec(),
            resource_classes: DEFAULT_RESOURCE_CLASSES,
            system_resources: None,
            tick_budget: DEFAULT_TICK_BUDGET,
        }
    }
}

impl KernelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), algorithm = %config.algorithm, "Configuration loaded");
        Ok(config)
    }

    /// Overlay `KERNEL_*` environment variables
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, keyed by environment variable name
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup("KERNEL_ALGORITHM") {
            self.algorithm = value.parse()?;
        }
        if let Some(value) = lookup("KERNEL_RR_QUANTUM") {
            self.rr_quantum = parse_number("KERNEL_RR_QUANTUM", &value)?;
        }
        if let Some(value) = lookup("KERNEL_MLFQ_QUANTA") {
            self.mlfq_quanta = value
                .split(',')
                .map(|part| parse_number("KERNEL_MLFQ_QUANTA", part))
                .collect::<Result<Vec<u32>>>()?;
        }
        if let Some(value) = lookup("KERNEL_TICK_BUDGET") {
            self.tick_budget = parse_number("KERNEL_TICK_BUDGET", &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        RoundRobin::new(self.rr_quantum)?;
        Mlfq::new(self.mlfq_quanta.clone())?;

        if self.resource_classes == 0 {
            return Err(KernelError::Configuration(
                "resource_classes must be at least 1".into(),
            ));
        }
        if let Some(ref resources) = self.system_resources {
            resources.ensure_classes(self.resource_classes)?;
        }
        if self.tick_budget == 0 {
            return Err(KernelError::Configuration(
                "tick_budget must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| KernelError::Configuration(format!("{}: '{}' is not a number", key, value).into()))
}
