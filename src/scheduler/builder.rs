/*!
 * Scheduler Builder
 * Builder pattern for Scheduler construction
 */

use super::policy::build_policy;
use super::types::Algorithm;
use super::Scheduler;
use crate::config::KernelConfig;
use crate::core::errors::Result;
use crate::resources::{ResourceLedger, ResourceVector};
use tracing::info;

/// Builder for Scheduler
#[derive(Debug, Clone, Default)]
pub struct SchedulerBuilder {
    config: KernelConfig,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a full configuration
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Round-robin slice, also kept for later `set_algorithm` switches
    pub fn with_rr_quantum(mut self, quantum: u32) -> Self {
        self.config.rr_quantum = quantum;
        self
    }

    /// Feedback-queue slices, highest priority first
    pub fn with_mlfq_quanta(mut self, quanta: impl Into<Vec<u32>>) -> Self {
        self.config.mlfq_quanta = quanta.into();
        self
    }

    /// Number of resource classes the ledger tracks
    pub fn with_resource_classes(mut self, classes: usize) -> Self {
        self.config.resource_classes = classes;
        self
    }

    /// Initial available vector; also fixes the number of classes
    pub fn with_system_resources(mut self, available: impl Into<ResourceVector>) -> Self {
        let available = available.into();
        self.config.resource_classes = available.classes();
        self.config.system_resources = Some(available);
        self
    }

    /// Validate the configuration and build the scheduler
    pub fn build(self) -> Result<Scheduler> {
        let config = self.config;
        config.validate()?;

        let policy = build_policy(config.algorithm, config.rr_quantum, &config.mlfq_quanta)?;
        let mut ledger = ResourceLedger::new(config.resource_classes);
        if let Some(available) = config.system_resources {
            ledger.set_system_resources(available)?;
        }

        info!(
            algorithm = %config.algorithm,
            rr_quantum = config.rr_quantum,
            mlfq_quanta = ?config.mlfq_quanta,
            resource_classes = config.resource_classes,
            "Scheduler built"
        );

        Ok(Scheduler::from_parts(
            policy,
            config.rr_quantum,
            config.mlfq_quanta,
            ledger,
        ))
    }
}
