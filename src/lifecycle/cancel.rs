//! Interruptible waiting for the keep-alive loop.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// The controller's only suspension point.
pub trait Pacer {
    /// Block for `duration` unless cancelled first.
    fn pause(&self, duration: Duration) -> WaitOutcome;
}

#[derive(Debug, Default)]
struct Shared {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Cancellation flag that wakes a thread blocked in [`Pacer::pause`].
///
/// Clones share the same flag, so one clone can be moved into a signal
/// handler while the controller waits on another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        *self.lock() = true;
        self.shared.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool, so a poisoned lock still holds a usable value.
        self.shared
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Pacer for CancellationToken {
    /// A `duration` too large to express as a deadline waits until cancelled.
    fn pause(&self, duration: Duration) -> WaitOutcome {
        let deadline = Instant::now().checked_add(duration);
        let mut cancelled = self.lock();

        loop {
            if *cancelled {
                return WaitOutcome::Cancelled;
            }
            cancelled = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return WaitOutcome::Elapsed;
                    }
                    match self.shared.wake.wait_timeout(cancelled, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
                None => match self.shared.wake.wait(cancelled) {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                },
            };
        }
    }
}

/// Cancel `token` when the process receives Ctrl+C or a termination signal.
///
/// Can only be installed once per process.
pub fn cancel_on_interrupt(token: &CancellationToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        info!("interrupt received, stopping refresh loop");
        token.cancel();
    })
    .context("Failed to set Ctrl+C handler")
}
