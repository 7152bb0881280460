//! Cancellable periodic tick

use std::{ops::ControlFlow, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

/// A background task that calls a closure once per period until the closure
/// breaks or the source is cancelled. Dropping the source cancels it.
#[derive(Debug)]
pub struct TickSource {
    handle: JoinHandle<()>,
}

impl TickSource {
    /// Start ticking. The first tick fires one full `period` from now.
    /// Must be called from within a tokio runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled runtime delivers late ticks one period apart, never in a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
        });

        Self { handle }
    }

    /// Stop the source. Calling this on a finished source does nothing.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
