//! Linux poller: `epoll_wait` on a single `eventfd`.
//!
//! The eventfd is the only registered descriptor. Writing to it
//! through the [`Notifier`] interrupts a blocked `epoll_wait`; the
//! timeout argument carries the next timer deadline.

use libc::{EFD_CLOEXEC, EFD_NONBLOCK, EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLLIN, epoll_event};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::sync::Arc;
use std::time::Duration;

/// Token of the eventfd registration.
const NOTIFY_TOKEN: u64 = 0;

/// Wakes an [`EpollPoller`] from any thread.
pub(crate) struct Notifier(OwnedFd);

impl Notifier {
    pub(crate) fn notify(&self) {
        let one: u64 = 1;

        // A full counter (EAGAIN) still leaves the fd readable.
        unsafe {
            libc::write(
                self.0.as_raw_fd(),
                (&one as *const u64).cast(),
                size_of::<u64>(),
            );
        }
    }

    /// Resets the eventfd counter so the next wait blocks again.
    fn drain(&self) {
        let mut count: u64 = 0;

        unsafe {
            libc::read(
                self.0.as_raw_fd(),
                (&mut count as *mut u64).cast(),
                size_of::<u64>(),
            );
        }
    }
}

pub(crate) struct EpollPoller {
    epoll: OwnedFd,
    notifier: Arc<Notifier>,
}

impl EpollPoller {
    pub(crate) fn new() -> io::Result<Self> {
        let epoll = unsafe { libc::epoll_create1(EPOLL_CLOEXEC) };
        if epoll < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: `epoll` is a freshly created descriptor we own.
        let epoll = unsafe { OwnedFd::from_raw_fd(epoll) };

        let eventfd = unsafe { libc::eventfd(0, EFD_NONBLOCK | EFD_CLOEXEC) };
        if eventfd < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: as above.
        let eventfd = unsafe { OwnedFd::from_raw_fd(eventfd) };

        let mut event = epoll_event {
            events: EPOLLIN as u32,
            u64: NOTIFY_TOKEN,
        };

        let rc = unsafe {
            libc::epoll_ctl(
                epoll.as_raw_fd(),
                EPOLL_CTL_ADD,
                eventfd.as_raw_fd(),
                &mut event,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self {
            epoll,
            notifier: Arc::new(Notifier(eventfd)),
        })
    }

    pub(crate) fn notifier(&self) -> Arc<Notifier> {
        self.notifier.clone()
    }

    /// Blocks until notified or until `timeout` elapses; `None` waits
    /// for a notification only.
    pub(crate) fn wait(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        let mut events = [epoll_event { events: 0, u64: 0 }];

        let n = unsafe {
            libc::epoll_wait(
                self.epoll.as_raw_fd(),
                events.as_mut_ptr(),
                events.len() as i32,
                timeout_ms(timeout),
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            return Err(err);
        }

        if n > 0 {
            self.notifier.drain();
        }

        Ok(())
    }
}

/// Converts a timeout to `epoll_wait` milliseconds, rounding up so a
/// sub-millisecond remainder does not turn into a busy loop.
fn timeout_ms(timeout: Option<Duration>) -> i32 {
    match timeout {
        None => -1,
        Some(timeout) => {
            let millis = timeout.as_nanos().div_ceil(1_000_000);
            millis.min(i32::MAX as u128) as i32
        }
    }
}
