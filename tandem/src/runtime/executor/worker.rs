use crate::runtime::context::{self, Handle};
use crate::runtime::task::Runnable;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::sync::Arc;

/// One executor thread.
///
/// Each iteration takes the first task found in:
/// 1. its own local queue,
/// 2. the injector,
/// 3. another worker's local queue,
///
/// and parks on the injector when all three are empty.
pub(crate) struct Worker {
    id: usize,

    /// Every worker's local queue, indexed by worker id.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    handle: Handle,
}

impl Worker {
    pub(crate) fn new(id: usize, locals: Arc<Vec<Arc<LocalQueue>>>, handle: Handle) -> Self {
        Self { id, locals, handle }
    }

    /// Runs the scheduling loop until the injector is shut down.
    pub(crate) fn run(self) {
        let handle = self.handle.clone();
        let locals = self.locals.clone();

        context::enter_worker(handle, self.id, locals, || {
            tracing::debug!(worker = self.id, "worker started");

            while !self.handle.injector.is_shutdown() {
                match self.next_task() {
                    Some(task) => task.run(),
                    None => self.handle.injector.park(),
                }
            }

            tracing::debug!(worker = self.id, "worker stopped");
        });
    }

    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.handle.injector.pop())
            .or_else(|| self.steal())
    }

    /// Visits the other workers round-robin, starting after this one.
    fn steal(&self) -> Option<Arc<dyn Runnable>> {
        let len = self.locals.len();

        (1..len)
            .map(|offset| (self.id + offset) % len)
            .find_map(|victim| self.locals[victim].steal())
    }
}
