use super::timer::TimerEntry;

/// Messages sent to the reactor thread.
pub(crate) enum Command {
    /// Fire `TimerEntry::slot` once `TimerEntry::deadline` has passed.
    AddTimer(TimerEntry),

    /// Stop the reactor loop. Pending timers are dropped unfired.
    Shutdown,
}
