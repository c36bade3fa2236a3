/*!
 * Monitoring Module
 * Kernel event notifications and tracing setup
 */

pub mod events;
pub mod tracer;

pub use events::{Category, EventBus, KernelEvent};
pub use tracer::init_tracing;
