use super::core::Runtime;
use crate::error::Error;

use std::thread;

/// Builder for configuring and creating a [`Runtime`].
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .worker_threads(2)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    worker_threads: usize,
}

impl RuntimeBuilder {
    /// Creates a builder with one worker per available logical CPU,
    /// or a single worker if that cannot be determined.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self { worker_threads }
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Starts the reactor and the worker threads.
    ///
    /// Fails if the platform waiter or any thread cannot be created.
    pub fn build(self) -> Result<Runtime, Error> {
        Ok(Runtime::new(self.worker_threads)?)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "worker_threads must be > 0")]
    fn zero_workers_rejected() {
        let _ = RuntimeBuilder::new().worker_threads(0);
    }

    #[test]
    fn defaults_to_at_least_one_worker() {
        assert!(RuntimeBuilder::default().worker_threads >= 1);
    }
}
