//! Deferred task queue on the audio clock.
//!
//! Looping sequences and pad changes are tasks with a due time. Each task
//! carries the [`CancelToken`] of the graph that scheduled it; a cancelled
//! token means the task is dropped instead of run, and it never reschedules.

use fnv::FnvHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub struct Scheduled<K> {
    pub id: TaskId,
    pub due: f64,
    pub kind: K,
    pub token: CancelToken,
}

#[derive(Debug)]
pub struct Scheduler<K> {
    tasks: FnvHashMap<TaskId, Scheduled<K>>,
    next_id: u64,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            tasks: FnvHashMap::default(),
            next_id: 0,
        }
    }
}

impl<K> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `kind` for `due`. Returns `None` without queuing when the token
    /// is already cancelled.
    pub fn schedule(&mut self, due: f64, kind: K, token: &CancelToken) -> Option<TaskId> {
        if token.is_cancelled() {
            return None;
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(
            id,
            Scheduled {
                id,
                due,
                kind,
                token: token.clone(),
            },
        );
        Some(id)
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Drops every pending task. Returns how many were pending.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.tasks.len();
        for task in self.tasks.values() {
            task.token.cancel();
        }
        self.tasks.clear();
        n
    }

    /// Removes and returns the earliest task due at or before `horizon`.
    /// Tasks whose token was cancelled are discarded on the way.
    pub fn pop_due(&mut self, horizon: f64) -> Option<Scheduled<K>> {
        self.tasks.retain(|_, t| !t.token.is_cancelled());
        let id = self
            .tasks
            .values()
            .filter(|t| t.due <= horizon)
            .min_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|t| t.id)?;
        self.tasks.remove(&id)
    }

    pub fn next_due(&self) -> Option<f64> {
        self.tasks
            .values()
            .filter(|t| !t.token.is_cancelled())
            .map(|t| t.due)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
