//! Waiting for every task in a group.
//!
//! [`join_all`] and [`join_all_settled`] never return before every handle
//! they were given has completed. They differ only in how failures are
//! reported:
//! - [`join_all`] returns the first failure, in completion order,
//! - [`join_all_settled`] returns every result.
//!
//! [`run`] ties this to units of work: it spawns each unit as its own
//! task and joins them all.

use crate::error::{Error, JoinError};
use crate::task::{self, JoinHandle};
use crate::time::instrumented;
use crate::unit::{MarkerSink, Unit};

use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;

/// Polls every handle until all have completed, handing each result to
/// `on_ready` together with the handle's position, in completion order.
async fn drive<T, F>(handles: Vec<JoinHandle<T>>, mut on_ready: F)
where
    F: FnMut(usize, Result<T, JoinError>),
{
    let mut pending: Vec<Option<JoinHandle<T>>> = handles.into_iter().map(Some).collect();

    poll_fn(|cx| {
        let mut waiting = false;

        for (index, slot) in pending.iter_mut().enumerate() {
            let Some(handle) = slot else {
                continue;
            };

            match Pin::new(handle).poll(cx) {
                Poll::Ready(result) => {
                    *slot = None;
                    on_ready(index, result);
                }
                Poll::Pending => waiting = true,
            }
        }

        if waiting { Poll::Pending } else { Poll::Ready(()) }
    })
    .await
}

/// Waits for all tasks, then returns their outputs in argument order.
///
/// If any task failed, the error of the one that failed **first** is
/// returned instead, but only after the remaining tasks have completed
/// as well.
///
/// # Examples
///
/// ```rust,ignore
/// let a = task::spawn(async { 1 });
/// let b = task::spawn(async { 2 });
/// assert_eq!(join_all([a, b]).await?, vec![1, 2]);
/// ```
pub async fn join_all<T, I>(handles: I) -> Result<Vec<T>, JoinError>
where
    I: IntoIterator<Item = JoinHandle<T>>,
{
    let handles: Vec<_> = handles.into_iter().collect();
    let mut outputs: Vec<Option<T>> = handles.iter().map(|_| None).collect();
    let mut first_error = None;

    drive(handles, |index, result| match result {
        Ok(value) => outputs[index] = Some(value),
        Err(err) => {
            first_error.get_or_insert(err);
        }
    })
    .await;

    match first_error {
        Some(err) => Err(err),
        None => Ok(outputs.into_iter().flatten().collect()),
    }
}

/// Waits for all tasks and returns every result, in argument order.
pub async fn join_all_settled<T, I>(handles: I) -> Vec<Result<T, JoinError>>
where
    I: IntoIterator<Item = JoinHandle<T>>,
{
    let handles: Vec<_> = handles.into_iter().collect();
    let mut results: Vec<Option<Result<T, JoinError>>> = handles.iter().map(|_| None).collect();

    drive(handles, |index, result| results[index] = Some(result)).await;

    results.into_iter().flatten().collect()
}

/// Summary of a [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Number of units joined.
    pub units: usize,

    /// Wall-clock time from launching the first unit to joining the last.
    pub elapsed: Duration,
}

/// Launches every unit as its own task, then waits for all of them.
///
/// All units are spawned before any is awaited, so their delays overlap
/// and the whole run takes about as long as the slowest unit. Each unit
/// runs up to its first suspension as it is launched, so start markers
/// are recorded in argument order.
///
/// A panicking unit is reported as [`Error::Join`] (first failure in
/// completion order); otherwise the first unit, in argument order, that
/// returned an error decides the result.
///
/// # Panics
///
/// Panics if called outside of a tandem runtime.
pub async fn run(units: Vec<Unit>, sink: Arc<dyn MarkerSink>) -> Result<Report, Error> {
    let count = units.len();

    let (joined, elapsed) = instrumented(async move {
        let handles: Vec<_> = units
            .into_iter()
            .map(|unit| task::spawn_eager(unit.run(sink.clone())))
            .collect();

        join_all(handles).await
    })
    .await;

    for outcome in joined? {
        outcome?;
    }

    tracing::info!(units = count, elapsed = ?elapsed, "all units joined");

    Ok(Report {
        units: count,
        elapsed,
    })
}
