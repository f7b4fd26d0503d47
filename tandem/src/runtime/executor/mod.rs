//! Worker threads.
//!
//! - [`core`]: spawns the workers and tears them down,
//! - [`worker`]: the per-thread scheduling loop.

pub(crate) mod core;
pub(crate) mod worker;
