/*!
 * Process Table
 * Arena of process records addressed by generation-checked handles
 */

use super::record::ProcessRecord;
use crate::core::types::Pid;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque reference to a process record
///
/// The generation changes every time a slot is reused, so a handle kept
/// across a reap can never resolve to a different process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    record: Option<ProcessRecord>,
}

/// Owns every process record
///
/// Iteration follows creation order, which is the tie-break order for
/// admission and for the safety check.
#[derive(Debug, Default)]
pub struct ProcessTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_pid: HashMap<Pid, ProcessHandle, RandomState>,
    order: Vec<ProcessHandle>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, returning `None` if its pid is taken
    pub(crate) fn insert(&mut self, record: ProcessRecord) -> Option<ProcessHandle> {
        if self.by_pid.contains_key(record.pid()) {
            return None;
        }

        let pid = record.pid().clone();
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.record = Some(record);
                ProcessHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    record: Some(record),
                });
                ProcessHandle {
                    index,
                    generation: 0,
                }
            }
        };

        self.by_pid.insert(pid, handle);
        self.order.push(handle);
        Some(handle)
    }

    /// Drop a record and retire its handle
    pub(crate) fn remove(&mut self, handle: ProcessHandle) -> Option<ProcessRecord> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.by_pid.remove(record.pid());
        self.order.retain(|h| *h != handle);
        Some(record)
    }

    #[inline]
    pub fn handle_of(&self, pid: &str) -> Option<ProcessHandle> {
        self.by_pid.get(pid).copied()
    }

    pub fn get(&self, handle: ProcessHandle) -> Option<&ProcessRecord> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.record.as_ref())
    }

    pub(crate) fn get_mut(&mut self, handle: ProcessHandle) -> Option<&mut ProcessRecord> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.record.as_mut())
    }

    pub fn by_pid(&self, pid: &str) -> Option<&ProcessRecord> {
        self.handle_of(pid).and_then(|h| self.get(h))
    }

    pub(crate) fn by_pid_mut(&mut self, pid: &str) -> Option<&mut ProcessRecord> {
        let handle = self.handle_of(pid)?;
        self.get_mut(handle)
    }

    /// Records in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> + '_ {
        self.order.iter().filter_map(move |h| self.get(*h))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
