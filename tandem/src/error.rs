//! Error types.
//!
//! [`JoinError`] is what awaiting a [`JoinHandle`](crate::task::JoinHandle)
//! yields when the task did not produce a value. [`Error`] covers everything
//! else the crate can fail with: runtime start-up, console I/O, command-line
//! parsing, and joined units that failed.

use crate::task::TaskId;

use std::any::Any;
use std::io;

/// A spawned task finished without producing its output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// The task's future panicked while being polled.
    #[error("task {id} panicked: {message}")]
    Panicked { id: TaskId, message: String },
}

impl JoinError {
    /// Builds a [`JoinError::Panicked`] from a panic payload.
    ///
    /// `&str` and `String` payloads keep their text; anything else is
    /// reported as an opaque panic.
    pub(crate) fn panicked(id: TaskId, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("Box<dyn Any>")
        };

        JoinError::Panicked { id, message }
    }

    /// Id of the task that failed.
    pub fn id(&self) -> TaskId {
        match self {
            JoinError::Panicked { id, .. } => *id,
        }
    }
}

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("invalid value for `{flag}`: {reason}")]
    InvalidArgument { flag: String, reason: String },

    #[error("unknown flag `{flag}`")]
    UnknownFlag { flag: String },
}
