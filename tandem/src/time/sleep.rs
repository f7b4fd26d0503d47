use crate::reactor::command::Command;
use crate::reactor::timer::{TimerEntry, TimerSlot};
use crate::runtime::context;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Waits until `duration` has elapsed.
///
/// The deadline is fixed when `sleep` is called, not when the future is
/// first polled. A zero duration completes on the first poll without
/// involving the reactor.
///
/// # Panics
///
/// The returned future panics if it has to wait and is polled outside
/// of a tandem runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        deadline: Instant::now() + duration,
        slot: None,
    }
}

/// Future returned by [`sleep`].
///
/// The timer is registered with the reactor on the first poll that
/// finds the deadline in the future. Dropping the future before it
/// completes cancels the timer.
pub struct Sleep {
    deadline: Instant,

    /// Shared with the reactor once registered.
    slot: Option<Arc<TimerSlot>>,
}

impl Sleep {
    /// The instant this sleep completes at.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns `true` once the deadline has passed.
    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if let Some(slot) = &this.slot {
            return if slot.poll_fired(cx.waker()) || this.is_elapsed() {
                Poll::Ready(())
            } else {
                Poll::Pending
            };
        }

        if this.is_elapsed() {
            return Poll::Ready(());
        }

        let handle = context::current().expect("`Sleep` polled outside of a tandem runtime");
        let slot = Arc::new(TimerSlot::new(cx.waker().clone()));

        let registered = handle.reactor.send(Command::AddTimer(TimerEntry {
            deadline: this.deadline,
            slot: slot.clone(),
        }));

        if registered.is_err() {
            tracing::warn!("reactor gone, sleep will not be woken");
        }

        this.slot = Some(slot);
        Poll::Pending
    }
}

impl fmt::Debug for Sleep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sleep")
            .field("deadline", &self.deadline)
            .field("registered", &self.slot.is_some())
            .finish()
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(slot) = &self.slot {
            slot.cancel();
        }
    }
}
