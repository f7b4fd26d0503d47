//! The runtime the joiner runs on.
//!
//! A fixed pool of worker threads polls tasks taken from per-worker
//! local queues and a shared injector, stealing from each other when
//! idle. Timers are served by the reactor thread (see `crate::reactor`).
//!
//! Most code only needs [`RuntimeBuilder`](builder::RuntimeBuilder),
//! [`Runtime::block_on`](self::core::Runtime::block_on) and
//! [`task::spawn`].

mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod core;

pub mod task;
