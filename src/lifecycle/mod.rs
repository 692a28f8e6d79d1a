//! Announcement lifecycle: announce, keep alive, unlist.

pub mod cancel;
pub mod controller;
pub mod schedule;
pub mod state;

pub use cancel::{cancel_on_interrupt, CancellationToken, Pacer, WaitOutcome};
pub use controller::{LifecycleController, LifecycleEvent, LifecycleOutcome};
pub use schedule::{refresh_period_minutes, RefreshSchedule, MAX_REFRESH_WAIT};
pub use state::LifecycleState;
