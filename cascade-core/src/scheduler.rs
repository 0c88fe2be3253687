// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deferred work for single-threaded, event-driven UI code.
//!
//! Instead of closures capturing the widget, callers submit plain task values
//! and get a [TaskHandle] back. The host drives time: it calls
//! [Scheduler::take_due] with the current timestamp and
//! [Scheduler::take_next_layout] once its layout pass settled, and the owner
//! of the scheduler executes whatever comes out.

use std::collections::BTreeMap;

/// Cancellation token for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// A queue of delayed and next-layout tasks.
#[derive(Debug)]
pub struct Scheduler<T> {
    /// Current time in milliseconds, as last reported by the host
    now: u64,
    next_id: u64,
    /// Delayed tasks keyed by (deadline, handle) so equal deadlines run in submission order
    timers: BTreeMap<(u64, TaskHandle), T>,
    deadlines: BTreeMap<TaskHandle, u64>,
    /// Tasks waiting for the next layout pass
    next_layout: Vec<(TaskHandle, T)>,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 1,
            timers: BTreeMap::new(),
            deadlines: BTreeMap::new(),
            next_layout: Vec::new(),
        }
    }

    fn next_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// The last timestamp reported by the host.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `task` once `delay_ms` milliseconds have passed.
    pub fn schedule_after(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let handle = self.next_handle();
        let deadline = self.now.saturating_add(delay_ms);
        self.timers.insert((deadline, handle), task);
        self.deadlines.insert(handle, deadline);
        handle
    }

    /// Run `task` after the next layout pass.
    pub fn schedule_next_layout(&mut self, task: T) -> TaskHandle {
        let handle = self.next_handle();
        self.next_layout.push((handle, task));
        handle
    }

    /// Cancel a pending task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if let Some(deadline) = self.deadlines.remove(&handle) {
            return self.timers.remove(&(deadline, handle)).is_some();
        }

        let before = self.next_layout.len();
        self.next_layout.retain(|(pending, _)| *pending != handle);
        before != self.next_layout.len()
    }

    /// Check whether a task is still pending.
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.deadlines.contains_key(&handle)
            || self.next_layout.iter().any(|(pending, _)| *pending == handle)
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.deadlines.clear();
        self.next_layout.clear();
    }

    /// Number of pending tasks of both kinds.
    pub fn len(&self) -> usize {
        self.timers.len() + self.next_layout.len()
    }

    /// Check whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance the clock to `now` and take every task whose deadline passed.
    ///
    /// Time never goes backwards; an older timestamp is ignored.
    pub fn take_due(&mut self, now: u64) -> Vec<T> {
        self.now = self.now.max(now);

        let pending = self.timers.split_off(&(self.now.saturating_add(1), TaskHandle(0)));
        let due = std::mem::replace(&mut self.timers, pending);

        due.into_iter()
            .map(|((_, handle), task)| {
                self.deadlines.remove(&handle);
                task
            })
            .collect()
    }

    /// Take every task waiting for the layout pass.
    pub fn take_next_layout(&mut self) -> Vec<T> {
        std::mem::take(&mut self.next_layout)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
