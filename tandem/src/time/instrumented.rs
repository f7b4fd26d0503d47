use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Wraps a future so that it also reports how long it took.
///
/// Resolves to `(output, elapsed)`, where `elapsed` is measured from the
/// **first poll**, not from construction.
///
/// # Examples
///
/// ```rust,ignore
/// let ((), elapsed) = instrumented(sleep(Duration::from_millis(5))).await;
/// assert!(elapsed >= Duration::from_millis(5));
/// ```
pub fn instrumented<F: Future>(future: F) -> Instrumented<F> {
    Instrumented {
        future,
        started: None,
    }
}

/// Future returned by [`instrumented`].
#[derive(Debug)]
pub struct Instrumented<F> {
    future: F,
    started: Option<Instant>,
}

impl<F: Future> Future for Instrumented<F> {
    type Output = (F::Output, Duration);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // SAFETY: `future` is never moved out of the pinned struct;
        // `started` is plain data and not structurally pinned.
        let this = unsafe { self.get_unchecked_mut() };
        let started = *this.started.get_or_insert_with(Instant::now);
        let future = unsafe { Pin::new_unchecked(&mut this.future) };

        future
            .poll(cx)
            .map(|output| (output, started.elapsed()))
    }
}
