/*!
 * Execution Trace
 * Gantt-style record of who held the CPU and when
 */

use crate::core::types::{Pid, Tick};
use serde::Serialize;
use std::fmt::Write;

/// One uninterrupted stretch on the CPU, `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub pid: Pid,
    pub start: Tick,
    pub end: Tick,
}

impl Segment {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Segments in dispatch order
///
/// A segment opens at dispatch and closes when the process finishes, is
/// requeued, is preempted or blocks. Zero-length segments are dropped.
#[derive(Debug, Clone, Default)]
pub struct ExecutionTrace {
    segments: Vec<Segment>,
    open: Option<(Pid, Tick)>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&mut self, pid: Pid, at: Tick) {
        debug_assert!(self.open.is_none(), "segment already open");
        self.open = Some((pid, at));
    }

    pub(crate) fn close(&mut self, at: Tick) {
        if let Some((pid, start)) = self.open.take() {
            if at > start {
                self.segments.push(Segment { pid, start, end: at });
            }
        }
    }

    /// Closed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Process currently holding an open segment and since when
    pub fn current(&self) -> Option<(&Pid, Tick)> {
        self.open.as_ref().map(|(pid, start)| (pid, *start))
    }

    /// Table in the shell's `pid | Start | End` layout
    pub fn render(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            let _ = writeln!(out, "{:>8} | Start: {:>3} | End: {:>3}", seg.pid, seg.start, seg.end);
        }
        out
    }
}
