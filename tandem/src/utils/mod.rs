//! Small helpers shared by the runtime internals.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
///
/// Every mutex in the runtime guards plain data that stays consistent
/// across a panic (queues, wakers, flags), so poisoning carries no
/// information worth failing on.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
