use super::JoinHandle;
use super::id::TaskId;
use super::state::{AtomicState, State};
use crate::error::JoinError;
use crate::runtime::context;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;
use crate::utils::lock;

use std::cell::UnsafeCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A unit of work the scheduler can run without knowing its output type.
pub(crate) trait Runnable: Send + Sync {
    /// Polls the task once. Called by a worker thread.
    fn run(self: Arc<Self>);
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Output slot shared between a task and its [`JoinHandle`].
pub(crate) struct Completion<T> {
    /// Set exactly once, when the future finishes or panics.
    pub(crate) output: Option<Result<T, JoinError>>,

    /// Waker of the handle currently awaiting the output.
    pub(crate) waiter: Option<Waker>,

    /// The output has been handed to the join handle.
    pub(crate) taken: bool,
}

/// A spawned future together with its scheduling state and output slot.
pub(crate) struct Task<T> {
    pub(crate) id: TaskId,

    /// The future, dropped as soon as it completes.
    ///
    /// Only touched by the worker that moved the task into
    /// [`State::Running`].
    future: UnsafeCell<Option<BoxFuture<T>>>,

    pub(crate) state: AtomicState,

    /// Queue used when a wake-up reschedules the task.
    injector: InjectorHandle,

    pub(crate) completion: Mutex<Completion<T>>,
}

// SAFETY: `future` is only accessed by the single worker holding the
// `Running` state; everything else is atomics or behind a mutex.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    pub(crate) fn new<F>(future: F, injector: InjectorHandle) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            id: TaskId::next(),
            future: UnsafeCell::new(Some(Box::pin(future))),
            state: AtomicState::new(State::Queued),
            injector,
            completion: Mutex::new(Completion {
                output: None,
                waiter: None,
                taken: false,
            }),
        }
    }

    /// Polls the future once.
    ///
    /// A panic escaping the future completes the task with
    /// [`JoinError::Panicked`] instead of unwinding the worker.
    pub(crate) fn poll_once(self: Arc<Self>) {
        let claimed = self
            .state
            .transition(State::Queued, State::Running)
            .or_else(|_| self.state.transition(State::Notified, State::Running));

        if claimed.is_err() {
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        // SAFETY: the `Running` state grants exclusive access to the future.
        let slot = unsafe { &mut *self.future.get() };
        let Some(future) = slot.as_mut() else {
            return;
        };

        let poll = panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        match poll {
            Ok(Poll::Pending) => {
                if self.state.transition(State::Running, State::Idle).is_err() {
                    // Woken during the poll.
                    self.state.store(State::Queued);
                    self.injector.push(self.clone());
                }
            }
            Ok(Poll::Ready(value)) => {
                *slot = None;
                self.complete(Ok(value));
            }
            Err(payload) => {
                *slot = None;
                let err = JoinError::panicked(self.id, payload);
                tracing::debug!(task = %self.id, error = %err, "task failed");
                self.complete(Err(err));
            }
        }
    }

    fn complete(&self, output: Result<T, JoinError>) {
        let waiter = {
            let mut completion = lock(&self.completion);
            completion.output = Some(output);
            self.state.store(State::Complete);
            completion.waiter.take()
        };

        tracing::trace!(task = %self.id, "task complete");

        if let Some(waker) = waiter {
            waker.wake();
        }
    }

    /// Reschedules the task after a wake-up.
    ///
    /// An idle task goes back to the injector; a running one is marked
    /// [`State::Notified`] and re-queued by the worker once its poll returns.
    pub(crate) fn schedule(self: Arc<Self>) {
        loop {
            match self.state.load() {
                State::Idle => {
                    if self.state.transition(State::Idle, State::Queued).is_ok() {
                        self.injector.push(self.clone());
                        return;
                    }
                }
                State::Running => {
                    if self
                        .state
                        .transition(State::Running, State::Notified)
                        .is_ok()
                    {
                        return;
                    }
                }
                State::Queued | State::Notified | State::Complete => return,
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        self.poll_once();
    }
}

/// Spawns a future onto the current runtime.
///
/// From a worker thread the task lands on that worker's local queue,
/// otherwise on the global injector. The returned [`JoinHandle`] resolves
/// to the future's output, or to a [`JoinError`] if the future panicked.
///
/// Dropping the handle does not cancel the task.
///
/// # Panics
///
/// Panics if called outside of a tandem runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = tandem::task::spawn(async { 6 * 7 });
/// assert_eq!(handle.await.unwrap(), 42);
/// ```
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle =
        context::current().expect("`tandem::task::spawn` called outside of a tandem runtime");

    spawn_inner(future, &handle.injector, context::local_queue())
}

/// Spawns a future onto the current runtime and polls it once on the
/// calling thread before returning.
///
/// The future runs up to its first suspension point before the caller
/// continues, so side effects before that point happen in spawn order.
/// Later wake-ups schedule it like any other task, and a panic during
/// the first poll is reported through the [`JoinHandle`].
///
/// # Panics
///
/// Panics if called outside of a tandem runtime.
pub(crate) fn spawn_eager<F, T>(future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = context::current()
        .expect("`tandem::task::spawn_eager` called outside of a tandem runtime");

    let task = Arc::new(Task::new(future, handle.injector.clone()));
    tracing::trace!(task = %task.id, "task spawned eagerly");

    // Not queued yet: the first poll claims the `Queued` state here.
    task.clone().poll_once();

    JoinHandle { task }
}

pub(crate) fn spawn_inner<F, T>(
    future: F,
    injector: &InjectorHandle,
    local: Option<Arc<LocalQueue>>,
) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let task = Arc::new(Task::new(future, injector.clone()));
    tracing::trace!(task = %task.id, "task spawned");

    match local {
        Some(queue) => queue.push(task.clone()),
        None => injector.push(task.clone()),
    }

    JoinHandle { task }
}
