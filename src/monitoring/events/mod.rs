/*!
 * Event System
 * Strongly-typed kernel notifications for collaborators
 *
 * The memory manager watches `Finished` to reclaim backing memory, a
 * semaphore layer watches `Blocked` / `Woken`, and a shell can render the
 * whole stream. Subscribers receive events over unbounded flume channels.
 */

use crate::core::errors::RejectReason;
use crate::core::types::{Level, Pid, Tick};
use crate::resources::ResourceVector;
use crate::scheduler::Algorithm;
use serde::Serialize;

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Process,
    Scheduler,
    Resource,
}

/// Something observable happened inside the kernel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum KernelEvent {
    Created { pid: Pid, time: Tick, arrival: Tick },
    Admitted { pid: Pid, time: Tick },
    Dispatched { pid: Pid, time: Tick, level: Level },
    Preempted { pid: Pid, time: Tick, level: Level },
    QuantumExpired {
        pid: Pid,
        time: Tick,
        from_level: Level,
        to_level: Level,
    },
    Blocked { pid: Pid, time: Tick },
    Woken { pid: Pid, time: Tick },
    Suspended { pid: Pid, time: Tick },
    Activated { pid: Pid, time: Tick },
    Finished {
        pid: Pid,
        time: Tick,
        memory_size: usize,
    },
    Reaped { pid: Pid, time: Tick },
    ThreadCreated { pid: Pid, time: Tick, tid: u32 },
    ResourcesGranted {
        pid: Pid,
        time: Tick,
        granted: ResourceVector,
    },
    ResourcesReleased {
        pid: Pid,
        time: Tick,
        released: ResourceVector,
    },
    /// Everything a finished process held went back to the pool
    ResourcesReclaimed {
        pid: Pid,
        time: Tick,
        released: ResourceVector,
    },
    RequestRejected {
        pid: Pid,
        time: Tick,
        reason: RejectReason,
    },
    AlgorithmChanged { time: Tick, algorithm: Algorithm },
}

impl KernelEvent {
    /// Process the event concerns, if any
    pub fn pid(&self) -> Option<&Pid> {
        match self {
            KernelEvent::Created { pid, .. }
            | KernelEvent::Admitted { pid, .. }
            | KernelEvent::Dispatched { pid, .. }
            | KernelEvent::Preempted { pid, .. }
            | KernelEvent::QuantumExpired { pid, .. }
            | KernelEvent::Blocked { pid, .. }
            | KernelEvent::Woken { pid, .. }
            | KernelEvent::Suspended { pid, .. }
            | KernelEvent::Activated { pid, .. }
            | KernelEvent::Finished { pid, .. }
            | KernelEvent::Reaped { pid, .. }
            | KernelEvent::ThreadCreated { pid, .. }
            | KernelEvent::ResourcesGranted { pid, .. }
            | KernelEvent::ResourcesReleased { pid, .. }
            | KernelEvent::ResourcesReclaimed { pid, .. }
            | KernelEvent::RequestRejected { pid, .. } => Some(pid),
            KernelEvent::AlgorithmChanged { .. } => None,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            KernelEvent::Created { .. }
            | KernelEvent::Blocked { .. }
            | KernelEvent::Woken { .. }
            | KernelEvent::Suspended { .. }
            | KernelEvent::Activated { .. }
            | KernelEvent::Finished { .. }
            | KernelEvent::Reaped { .. }
            | KernelEvent::ThreadCreated { .. } => Category::Process,
            KernelEvent::Admitted { .. }
            | KernelEvent::Dispatched { .. }
            | KernelEvent::Preempted { .. }
            | KernelEvent::QuantumExpired { .. }
            | KernelEvent::AlgorithmChanged { .. } => Category::Scheduler,
            KernelEvent::ResourcesGranted { .. }
            | KernelEvent::ResourcesReleased { .. }
            | KernelEvent::ResourcesReclaimed { .. }
            | KernelEvent::RequestRejected { .. } => Category::Resource,
        }
    }
}

/// Fan-out of kernel events to subscribers
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<flume::Sender<KernelEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> flume::Receiver<KernelEvent> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber, pruning dropped receivers
    pub fn publish(&mut self, event: KernelEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
