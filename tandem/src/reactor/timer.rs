use crate::utils::lock;

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};
use std::task::Waker;
use std::time::Instant;

/// State shared between a sleep future and the reactor.
///
/// The reactor fires the slot; the future polls it and refreshes the
/// waker it wants to be woken with. Once cancelled, firing is a no-op.
pub(crate) struct TimerSlot {
    inner: Mutex<SlotState>,
}

struct SlotState {
    fired: bool,
    cancelled: bool,
    waker: Option<Waker>,
}

impl TimerSlot {
    pub(crate) fn new(waker: Waker) -> Self {
        Self {
            inner: Mutex::new(SlotState {
                fired: false,
                cancelled: false,
                waker: Some(waker),
            }),
        }
    }

    /// Returns `true` if the timer has fired; otherwise stores `waker`
    /// to be woken when it does.
    pub(crate) fn poll_fired(&self, waker: &Waker) -> bool {
        let mut state = lock(&self.inner);

        if state.fired {
            return true;
        }

        match &state.waker {
            Some(current) if current.will_wake(waker) => {}
            _ => state.waker = Some(waker.clone()),
        }

        false
    }

    /// Marks the timer as fired and wakes the stored waker.
    pub(crate) fn fire(&self) {
        let waker = {
            let mut state = lock(&self.inner);

            if state.cancelled {
                return;
            }

            state.fired = true;
            state.waker.take()
        };

        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Prevents the timer from ever waking its task.
    pub(crate) fn cancel(&self) {
        let mut state = lock(&self.inner);
        state.cancelled = true;
        state.waker = None;
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        lock(&self.inner).cancelled
    }
}

/// A timer waiting in the reactor heap.
pub(crate) struct TimerEntry {
    pub(crate) deadline: Instant,
    pub(crate) slot: Arc<TimerSlot>,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl Ord for TimerEntry {
    /// Reversed, so `BinaryHeap<TimerEntry>` pops the earliest deadline.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BinaryHeap;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::task::Wake;
    use std::time::Duration;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }

    fn counting_waker() -> (Arc<CountingWaker>, Waker) {
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        (counter.clone(), Waker::from(counter))
    }

    #[test]
    fn heap_pops_earliest_deadline_first() {
        let (_, waker) = counting_waker();
        let now = Instant::now();

        let mut heap = BinaryHeap::new();
        for offset in [30, 10, 20] {
            heap.push(TimerEntry {
                deadline: now + Duration::from_millis(offset),
                slot: Arc::new(TimerSlot::new(waker.clone())),
            });
        }

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|entry| entry.deadline - now)
            .collect();

        assert_eq!(
            order,
            [10, 20, 30].map(Duration::from_millis).to_vec()
        );
    }

    #[test]
    fn fire_wakes_once_and_sticks() {
        let (counter, waker) = counting_waker();
        let slot = TimerSlot::new(waker.clone());

        assert!(!slot.poll_fired(&waker));
        slot.fire();

        assert!(slot.poll_fired(&waker));
        assert_eq!(counter.0.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn cancelled_slot_never_wakes() {
        let (counter, waker) = counting_waker();
        let slot = TimerSlot::new(waker);

        slot.cancel();
        slot.fire();

        assert!(slot.is_cancelled());
        assert_eq!(counter.0.load(AtomicOrdering::SeqCst), 0);
    }
}
