//! Lock helpers

use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Lock a mutex, recovering the data if a previous holder panicked
pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Recovering from a poisoned lock");
        poisoned.into_inner()
    })
}
