//! Run queues.
//!
//! - [`injector`]: the shared queue every worker falls back to, which
//!   also parks idle workers,
//! - [`queue`]: one queue per worker, popped LIFO by its owner and
//!   stolen FIFO by the others.

pub(crate) mod injector;
pub(crate) mod queue;
