use crate::reactor::ReactorHandle;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

/// Runtime state reachable from any code running on a worker thread.
///
/// Timers need the reactor, [`spawn`](crate::task::spawn) needs the
/// injector. Both are installed once per worker thread instead of being
/// threaded through every future.
#[derive(Clone)]
pub(crate) struct Handle {
    pub(crate) reactor: ReactorHandle,
    pub(crate) injector: InjectorHandle,
}

/// The local queue owned by the current worker thread.
struct WorkerSlot {
    id: usize,
    locals: Arc<Vec<Arc<LocalQueue>>>,
}

thread_local! {
    static CURRENT: RefCell<Option<Handle>> = const { RefCell::new(None) };

    static WORKER: RefCell<Option<WorkerSlot>> = const { RefCell::new(None) };
}

/// Restores the previous thread-local state when dropped, so a panic
/// inside the entered closure cannot leak the context.
struct Reset {
    handle: Option<Handle>,
    worker: Option<WorkerSlot>,
}

impl Drop for Reset {
    fn drop(&mut self) {
        let handle = self.handle.take();
        let worker = self.worker.take();

        CURRENT.with(|cell| *cell.borrow_mut() = handle);
        WORKER.with(|cell| *cell.borrow_mut() = worker);
    }
}

/// Runs `f` on a worker thread with the runtime context installed.
///
/// `id` indexes into `locals` and names the queue that
/// [`local_queue`] returns for the duration of `f`.
pub(crate) fn enter_worker<R>(
    handle: Handle,
    id: usize,
    locals: Arc<Vec<Arc<LocalQueue>>>,
    f: impl FnOnce() -> R,
) -> R {
    let _reset = Reset {
        handle: CURRENT.with(|cell| cell.replace(Some(handle))),
        worker: WORKER.with(|cell| cell.replace(Some(WorkerSlot { id, locals }))),
    };

    f()
}

/// Returns a clone of the current runtime handle, if any.
pub(crate) fn current() -> Option<Handle> {
    CURRENT.with(|cell| cell.borrow().clone())
}

/// Returns the current worker's local queue, if running on a worker.
pub(crate) fn local_queue() -> Option<Arc<LocalQueue>> {
    WORKER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|slot| slot.locals[slot.id].clone())
    })
}
