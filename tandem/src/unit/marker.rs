use crate::utils::lock;

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Which end of a unit a marker reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Started,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Started => "Started",
            Phase::Finished => "Finished",
        })
    }
}

/// One line of unit output, displayed as `"<unit> Started"` or
/// `"<unit> Finished"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub unit: String,
    pub phase: Phase,
}

impl Marker {
    pub fn started(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            phase: Phase::Started,
        }
    }

    pub fn finished(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            phase: Phase::Finished,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.unit, self.phase)
    }
}

/// Destination for markers.
///
/// Units on different worker threads share one sink; each call to
/// [`record`](MarkerSink::record) must land as a whole, never
/// interleaved with another marker.
pub trait MarkerSink: Send + Sync {
    fn record(&self, marker: &Marker) -> io::Result<()>;
}

impl<S: MarkerSink + ?Sized> MarkerSink for Arc<S> {
    fn record(&self, marker: &Marker) -> io::Result<()> {
        (**self).record(marker)
    }
}

/// Writes each marker as one line on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl MarkerSink for Stdout {
    fn record(&self, marker: &Marker) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{marker}")?;
        out.flush()
    }
}

/// Keeps markers in memory, in the order they were recorded.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    markers: Arc<Mutex<Vec<Marker>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn markers(&self) -> Vec<Marker> {
        lock(&self.markers).clone()
    }

    /// Snapshot rendered the way [`Stdout`] would print it.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.markers).iter().map(Marker::to_string).collect()
    }

    /// Position of the first marker equal to `marker`.
    pub fn position(&self, marker: &Marker) -> Option<usize> {
        lock(&self.markers).iter().position(|m| m == marker)
    }
}

impl MarkerSink for Recorder {
    fn record(&self, marker: &Marker) -> io::Result<()> {
        lock(&self.markers).push(marker.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_render_like_the_console_lines() {
        assert_eq!(Marker::started("TaskAsync").to_string(), "TaskAsync Started");
        assert_eq!(Marker::finished("TaskAsync2").to_string(), "TaskAsync2 Finished");
    }

    #[test]
    fn recorder_clones_share_one_log() {
        let recorder = Recorder::new();
        let sink: Arc<dyn MarkerSink> = Arc::new(recorder.clone());

        sink.record(&Marker::started("a")).unwrap();
        sink.record(&Marker::finished("a")).unwrap();

        assert_eq!(recorder.lines(), ["a Started", "a Finished"]);
        assert_eq!(recorder.position(&Marker::finished("a")), Some(1));
        assert_eq!(recorder.position(&Marker::started("b")), None);
    }
}
