use super::core::Task;

use std::sync::Arc;
use std::task::Wake;

/// Waking a task reschedules it on the runtime it was spawned on.
///
/// Wakers are plain `Arc<Task<T>>` clones, so a waker keeps its task
/// alive until the waker itself is dropped.
impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().schedule();
    }
}
