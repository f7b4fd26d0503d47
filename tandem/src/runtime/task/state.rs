use std::sync::atomic::{AtomicU8, Ordering};

/// Scheduling state of a task.
///
/// ```text
/// Queued -> Running -> Idle -> Queued -> ...
///              |  \
///              |   -> Notified -> Queued
///              -> Complete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum State {
    /// Waiting for a wake-up; not in any queue.
    Idle = 0,

    /// Sitting in a run queue.
    Queued = 1,

    /// Being polled by exactly one worker.
    Running = 2,

    /// Woken while being polled; re-queued once the poll returns.
    Notified = 3,

    /// Output stored; never polled again.
    Complete = 4,
}

impl State {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => State::Idle,
            1 => State::Queued,
            2 => State::Running,
            3 => State::Notified,
            _ => State::Complete,
        }
    }
}

/// A [`State`] shared between workers and wakers.
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) fn new(state: State) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> State {
        State::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: State) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Moves from `current` to `new`, returning the observed state on failure.
    pub(crate) fn transition(&self, current: State, new: State) -> Result<(), State> {
        self.0
            .compare_exchange(
                current as u8,
                new as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(State::from_u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_only_from_expected_state() {
        let state = AtomicState::new(State::Queued);

        assert_eq!(state.transition(State::Idle, State::Queued), Err(State::Queued));
        assert_eq!(state.transition(State::Queued, State::Running), Ok(()));
        assert_eq!(state.load(), State::Running);

        state.store(State::Complete);
        assert_eq!(state.load(), State::Complete);
    }
}
