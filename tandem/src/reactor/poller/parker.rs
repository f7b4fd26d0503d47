use crate::utils::lock;

use std::io;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Wakes a [`ParkPoller`] from any thread.
pub(crate) struct Notifier {
    notified: Mutex<bool>,
    condvar: Condvar,
}

impl Notifier {
    pub(crate) fn notify(&self) {
        *lock(&self.notified) = true;
        self.condvar.notify_one();
    }
}

/// Portable poller built on a condition variable.
pub(crate) struct ParkPoller {
    notifier: Arc<Notifier>,
}

impl ParkPoller {
    pub(crate) fn new() -> io::Result<Self> {
        Ok(Self {
            notifier: Arc::new(Notifier {
                notified: Mutex::new(false),
                condvar: Condvar::new(),
            }),
        })
    }

    pub(crate) fn notifier(&self) -> Arc<Notifier> {
        self.notifier.clone()
    }

    /// Blocks until notified or until `timeout` elapses; `None` waits
    /// for a notification only.
    pub(crate) fn wait(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        let notifier = &self.notifier;
        let mut notified = lock(&notifier.notified);

        if !*notified {
            notified = match timeout {
                Some(timeout) => match notifier.condvar.wait_timeout(notified, timeout) {
                    Ok((guard, _)) => guard,
                    Err(poisoned) => poisoned.into_inner().0,
                },
                None => match notifier.condvar.wait(notified) {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                },
            };
        }

        *notified = false;
        Ok(())
    }
}
