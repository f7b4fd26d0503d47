use super::executor::core::Executor;
use super::task::JoinHandle;
use crate::error::JoinError;
use crate::reactor::command::Command;
use crate::reactor::{Reactor, ReactorHandle};

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, Thread};

/// A running tandem runtime.
///
/// `Runtime` owns:
/// - the executor and its worker threads,
/// - the reactor thread serving timers.
///
/// Dropping the runtime stops both and joins their threads. Tasks that
/// have not completed by then are dropped.
pub struct Runtime {
    executor: Executor,

    reactor: ReactorHandle,

    reactor_thread: Option<thread::JoinHandle<()>>,
}

impl Runtime {
    /// Starts the reactor, then `worker_threads` workers.
    pub(crate) fn new(worker_threads: usize) -> io::Result<Self> {
        let (reactor, reactor_thread) = Reactor::start()?;

        let executor = match Executor::new(reactor.clone(), worker_threads) {
            Ok(executor) => executor,
            Err(err) => {
                let _ = reactor.send(Command::Shutdown);
                let _ = reactor_thread.join();
                return Err(err);
            }
        };

        tracing::debug!(worker_threads, "runtime started");

        Ok(Self {
            executor,
            reactor,
            reactor_thread: Some(reactor_thread),
        })
    }

    /// Spawns a future onto the runtime.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let handle = runtime.spawn(async { 1 + 1 });
    /// assert_eq!(runtime.block_on(handle).unwrap(), 2);
    /// ```
    pub fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.executor.spawn(future)
    }

    /// Runs a future to completion on the runtime, blocking the calling
    /// thread until it finishes.
    ///
    /// The future runs as a regular task on the worker threads; the
    /// calling thread only parks until the task's output is ready.
    ///
    /// # Panics
    ///
    /// Panics with the task's panic message if the future panics, and
    /// if called from a worker thread of this runtime, which would wait
    /// on itself.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        assert!(
            super::context::current().is_none(),
            "`Runtime::block_on` called from inside a runtime"
        );

        let mut handle = self.spawn(future);
        let waker = Waker::from(Arc::new(Unpark(thread::current())));
        let mut cx = Context::from_waker(&waker);

        loop {
            match Pin::new(&mut handle).poll(&mut cx) {
                Poll::Ready(Ok(output)) => return output,
                Poll::Ready(Err(JoinError::Panicked { message, .. })) => panic!("{message}"),
                Poll::Pending => thread::park(),
            }
        }
    }
}

/// Wakes the thread blocked in [`Runtime::block_on`].
struct Unpark(Thread);

impl Wake for Unpark {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

impl Drop for Runtime {
    /// Stops the workers, then the reactor, and joins all threads.
    fn drop(&mut self) {
        self.executor.shutdown();
        self.executor.join();

        let _ = self.reactor.send(Command::Shutdown);

        if let Some(thread) = self.reactor_thread.take() {
            if thread.join().is_err() {
                tracing::error!("reactor thread panicked");
            }
        }

        tracing::debug!("runtime stopped");
    }
}
