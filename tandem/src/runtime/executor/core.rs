use crate::reactor::ReactorHandle;
use crate::runtime::context::Handle;
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::{JoinHandle, spawn_inner};
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::thread;

/// Owns the worker threads and the queues they share.
pub(crate) struct Executor {
    injector: InjectorHandle,

    locals: Arc<Vec<Arc<LocalQueue>>>,

    threads: Vec<thread::JoinHandle<()>>,
}

impl Executor {
    /// Starts `threads` workers, each with its own local queue.
    ///
    /// If a thread fails to start, the workers already running are shut
    /// down and joined before the error is returned.
    pub(crate) fn new(reactor: ReactorHandle, threads: usize) -> io::Result<Self> {
        let injector = Arc::new(Injector::new());
        let locals: Arc<Vec<_>> = Arc::new(
            (0..threads)
                .map(|_| Arc::new(LocalQueue::new()))
                .collect(),
        );

        let handle = Handle {
            reactor,
            injector: injector.clone(),
        };

        let mut executor = Self {
            injector,
            locals,
            threads: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let worker = Worker::new(id, executor.locals.clone(), handle.clone());

            let spawned = thread::Builder::new()
                .name(format!("tandem-worker-{id}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(thread) => executor.threads.push(thread),
                Err(err) => {
                    executor.shutdown();
                    executor.join();
                    return Err(err);
                }
            }
        }

        Ok(executor)
    }

    /// Schedules a future on the injector.
    pub(crate) fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        spawn_inner(future, &self.injector, None)
    }

    /// Tells every worker to exit after its current poll.
    pub(crate) fn shutdown(&self) {
        self.injector.shutdown();
    }

    /// Joins the workers, then drops whatever was still queued.
    pub(crate) fn join(&mut self) {
        for thread in self.threads.drain(..) {
            if thread.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }

        self.injector.clear();
        self.locals.iter().for_each(|queue| queue.clear());
    }
}
