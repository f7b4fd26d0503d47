//! The reactor thread.
//!
//! The reactor owns every pending timer. It sleeps in the platform
//! waiter until the earliest deadline or until a [`Command`] arrives,
//! then wakes the tasks whose deadlines have passed.
//!
//! Only the time primitives talk to it, through a [`ReactorHandle`]
//! found in the runtime context.
//!
//! [`Command`]: command::Command

mod core;
mod poller;

pub(crate) mod command;
pub(crate) mod timer;

pub(crate) use self::core::{Reactor, ReactorHandle};
