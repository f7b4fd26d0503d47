//! Time utilities backed by the runtime reactor.
//!
//! - [`sleep`] suspends a task for a duration,
//! - [`instrumented`] measures how long a future took to complete.

mod instrumented;
mod sleep;

#[doc(inline)]
pub use instrumented::{Instrumented, instrumented};

#[doc(inline)]
pub use sleep::{Sleep, sleep};
