use super::core::Task;
use super::id::TaskId;
use super::state::State;
use crate::error::JoinError;
use crate::utils::lock;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// An owned permission to await a spawned task.
///
/// Resolves to the task's output, or to a [`JoinError`] if the task
/// panicked. A handle yields its result once; polling it again after
/// that panics.
///
/// Dropping the handle detaches the task: it keeps running, and its
/// output is discarded.
pub struct JoinHandle<T> {
    pub(crate) task: Arc<Task<T>>,
}

impl<T> JoinHandle<T> {
    /// Id of the task behind this handle.
    pub fn id(&self) -> TaskId {
        self.task.id
    }

    /// Returns `true` once the task has produced its output.
    pub fn is_finished(&self) -> bool {
        self.task.state.load() == State::Complete
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = Result<T, JoinError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut completion = lock(&self.task.completion);

        if let Some(output) = completion.output.take() {
            completion.taken = true;
            return Poll::Ready(output);
        }

        assert!(!completion.taken, "`JoinHandle` polled after completion");

        match &completion.waiter {
            Some(waiter) if waiter.will_wake(cx.waker()) => {}
            _ => completion.waiter = Some(cx.waker().clone()),
        }

        Poll::Pending
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("id", &self.task.id)
            .field("finished", &self.is_finished())
            .finish()
    }
}
