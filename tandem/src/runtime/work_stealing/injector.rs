use crate::runtime::task::Runnable;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared handle to the injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// Upper bound on how long an idle worker sleeps before looking for
/// work to steal from its siblings' local queues, which do not signal.
const PARK_TIMEOUT: Duration = Duration::from_millis(5);

/// Global run queue.
///
/// Tasks spawned from outside a worker, and tasks rescheduled by a
/// wake-up, land here. Idle workers park on its condition variable.
pub(crate) struct Injector {
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Signalled on every push and on shutdown.
    available: Condvar,

    shutdown: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        lock(&self.queue).push_back(task);
        self.available.notify_one();
    }

    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.queue).pop_front()
    }

    /// Blocks the calling worker until a task is pushed, shutdown starts,
    /// or [`PARK_TIMEOUT`] elapses.
    pub(crate) fn park(&self) {
        let queue = lock(&self.queue);

        if self.is_shutdown() || !queue.is_empty() {
            return;
        }

        let _unused = self.available.wait_timeout(queue, PARK_TIMEOUT);
    }

    /// Flags shutdown and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        // Taking the lock orders the flag against a worker that is
        // between its check and its wait.
        let _queue = lock(&self.queue);
        self.shutdown.store(true, Ordering::Release);
        self.available.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Drops every queued task. Used once the workers have exited.
    pub(crate) fn clear(&self) {
        let drained: Vec<_> = lock(&self.queue).drain(..).collect();
        drop(drained);
    }
}
