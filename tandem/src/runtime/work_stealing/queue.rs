use crate::runtime::task::Runnable;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Run queue owned by one worker.
///
/// The owner pushes and pops at the back, so the task it spawned last
/// runs next while its data is still warm. Thieves take from the front.
pub(crate) struct LocalQueue {
    tasks: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        lock(&self.tasks).push_back(task);
    }

    /// Owner side.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.tasks).pop_back()
    }

    /// Thief side.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.tasks).pop_front()
    }

    /// Drops every queued task. Used once the workers have exited.
    pub(crate) fn clear(&self) {
        let drained: Vec<_> = lock(&self.tasks).drain(..).collect();
        drop(drained);
    }
}
