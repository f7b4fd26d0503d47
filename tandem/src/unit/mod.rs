//! Units of work.
//!
//! A [`Unit`] records a start marker, sleeps for its delay, and records
//! a finish marker. Its [`UnitProgress`] can be watched from outside
//! while it runs.

mod marker;

pub use marker::{Marker, MarkerSink, Phase, Recorder, Stdout};

use crate::error::Error;
use crate::time::sleep;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

/// Lifecycle of a unit. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum UnitState {
    NotStarted = 0,
    Running = 1,
    Completed = 2,
}

/// Shared, read-only view of a unit's [`UnitState`].
#[derive(Debug, Clone)]
pub struct UnitProgress(Arc<AtomicU8>);

impl UnitProgress {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(UnitState::NotStarted as u8)))
    }

    pub fn state(&self) -> UnitState {
        match self.0.load(Ordering::Acquire) {
            0 => UnitState::NotStarted,
            1 => UnitState::Running,
            _ => UnitState::Completed,
        }
    }

    /// Never moves backwards.
    fn advance(&self, to: UnitState) {
        self.0.fetch_max(to as u8, Ordering::AcqRel);
    }
}

/// A named delay bracketed by start and finish markers.
#[derive(Debug)]
pub struct Unit {
    name: String,
    delay: Duration,
    progress: UnitProgress,
}

/// A clone is a separate unit with the same name and delay; it starts
/// out [`UnitState::NotStarted`] with its own progress.
impl Clone for Unit {
    fn clone(&self) -> Self {
        Self::new(self.name.clone(), self.delay)
    }
}

impl Unit {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
            progress: UnitProgress::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle for observing this unit's state, including after
    /// [`run`](Self::run) has consumed the unit.
    pub fn progress(&self) -> UnitProgress {
        self.progress.clone()
    }

    /// Runs the unit once.
    ///
    /// The start marker is recorded before the unit suspends, the finish
    /// marker after its delay, and the unit only reports
    /// [`UnitState::Completed`] once the finish marker is recorded.
    /// A sink error ends the unit early and is returned as is.
    pub async fn run(self, sink: Arc<dyn MarkerSink>) -> Result<(), Error> {
        self.progress.advance(UnitState::Running);
        tracing::debug!(unit = %self.name, delay = ?self.delay, "unit running");

        sink.record(&Marker::started(&self.name))?;
        sleep(self.delay).await;
        sink.record(&Marker::finished(&self.name))?;

        self.progress.advance(UnitState::Completed);
        tracing::debug!(unit = %self.name, "unit completed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeBuilder;

    use std::io;

    struct BrokenSink;

    impl MarkerSink for BrokenSink {
        fn record(&self, _: &Marker) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn run_moves_through_every_state() {
        let runtime = RuntimeBuilder::new().worker_threads(1).build().unwrap();
        let recorder = Recorder::new();

        let unit = Unit::new("solo", Duration::from_millis(10));
        let progress = unit.progress();
        assert_eq!(progress.state(), UnitState::NotStarted);

        runtime
            .block_on(unit.run(Arc::new(recorder.clone())))
            .unwrap();

        assert_eq!(progress.state(), UnitState::Completed);
        assert_eq!(recorder.lines(), ["solo Started", "solo Finished"]);
    }

    #[test]
    fn clones_track_their_own_progress() {
        let runtime = RuntimeBuilder::new().worker_threads(2).build().unwrap();
        let recorder = Recorder::new();

        let unit = Unit::new("twin", Duration::from_millis(10));
        let twin = unit.clone();
        let (first, second) = (unit.progress(), twin.progress());

        runtime
            .block_on(unit.run(Arc::new(recorder.clone())))
            .unwrap();

        assert_eq!(first.state(), UnitState::Completed);
        assert_eq!(second.state(), UnitState::NotStarted);

        runtime
            .block_on(twin.run(Arc::new(recorder.clone())))
            .unwrap();

        assert_eq!(second.state(), UnitState::Completed);
        assert_eq!(recorder.markers().len(), 4);
    }

    #[test]
    fn progress_never_moves_backwards() {
        let progress = UnitProgress::new();

        progress.advance(UnitState::Completed);
        progress.advance(UnitState::Running);

        assert_eq!(progress.state(), UnitState::Completed);
    }

    #[test]
    fn sink_failure_stops_the_unit() {
        let runtime = RuntimeBuilder::new().worker_threads(1).build().unwrap();

        let unit = Unit::new("mute", Duration::from_millis(10));
        let progress = unit.progress();

        let result = runtime.block_on(unit.run(Arc::new(BrokenSink)));

        assert!(matches!(result, Err(Error::Io(err)) if err.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(progress.state(), UnitState::Running);
    }
}
