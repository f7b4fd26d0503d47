//! Blocking wait used by the reactor between timer deadlines.
//!
//! A poller sleeps until a timeout expires or until its [`Notifier`] is
//! signalled from another thread. The implementation is chosen at
//! compile time:
//! - Linux: `epoll` waiting on an `eventfd`,
//! - elsewhere: a mutex and condition variable.

#[cfg(target_os = "linux")]
mod epoll;

#[cfg(not(target_os = "linux"))]
mod parker;

#[cfg(target_os = "linux")]
pub(crate) use epoll::{EpollPoller as Poller, Notifier};

#[cfg(not(target_os = "linux"))]
pub(crate) use parker::{ParkPoller as Poller, Notifier};

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn wait_returns_after_timeout() {
        let mut poller = Poller::new().unwrap();
        let start = Instant::now();

        poller.wait(Some(Duration::from_millis(20))).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn notify_interrupts_wait() {
        let mut poller = Poller::new().unwrap();
        let notifier = poller.notifier();

        let signaller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            notifier.notify();
        });

        let start = Instant::now();
        poller.wait(Some(Duration::from_secs(5))).unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
        signaller.join().unwrap();
    }

    #[test]
    fn notification_before_wait_is_not_lost() {
        let mut poller = Poller::new().unwrap();
        poller.notifier().notify();

        let start = Instant::now();
        poller.wait(Some(Duration::from_secs(5))).unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
