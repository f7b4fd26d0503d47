//! # Tandem
//!
//! **Tandem** runs independent units of work concurrently and waits for
//! all of them. Each unit announces that it started, sleeps for its
//! delay, and announces that it finished; the caller resumes only once
//! every unit has finished, so the whole run lasts as long as the
//! slowest unit rather than the sum of all delays.
//!
//! It ships with the small runtime it runs on:
//!
//! - a **work-stealing executor** on a fixed pool of worker threads,
//! - a **reactor thread** serving timers,
//! - **join handles** that report a panicking task as a [`JoinError`],
//! - **macros**: `#[tandem::main]`, `#[tandem::test]` and `join!`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tandem::joiner;
//! use tandem::unit::{Stdout, Unit};
//!
//! #[tandem::main]
//! async fn main() -> Result<(), tandem::Error> {
//!     let units = vec![
//!         Unit::new("TaskAsync", Duration::from_secs(10)),
//!         Unit::new("TaskAsync2", Duration::from_secs(5)),
//!     ];
//!
//!     // Prints both start markers, then TaskAsync2's finish, then TaskAsync's.
//!     joiner::run(units, Arc::new(Stdout)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`unit`]: units of work and the markers they emit
//! - [`joiner`]: waiting for a group of tasks
//! - [`task`]: spawning tasks
//! - [`time`]: sleep and timing
//! - [`settings`]: run configuration and command-line parsing
//! - [`console`]: terminal helpers

mod reactor;
mod runtime;
mod utils;

pub mod console;
pub mod error;
pub mod joiner;
pub mod settings;
pub mod time;
pub mod unit;

pub use error::{Error, JoinError};
pub use runtime::builder::RuntimeBuilder;
pub use runtime::core::Runtime;
pub use runtime::task;

pub use tandem_macros::{join, main, test};
