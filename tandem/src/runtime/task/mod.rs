//! Spawning tasks and awaiting their results.
//!
//! [`spawn`] schedules a future on the current runtime and returns a
//! [`JoinHandle`]. Awaiting the handle yields `Ok(output)` or, if the
//! future panicked, a [`JoinError`](crate::JoinError). There is no
//! cancellation: a spawned task always runs to completion.

mod handle;
mod id;
mod state;
mod waker;

pub(crate) mod core;

pub(crate) use self::core::{Runnable, spawn_eager, spawn_inner};

pub use self::core::spawn;
pub use handle::JoinHandle;
pub use id::TaskId;
