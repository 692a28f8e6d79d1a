use std::time::Duration;

use crate::config::LifecycleConfig;
use crate::models::LeaseTerms;

/// Longest wait between refreshes, whatever lease the server advertises.
pub const MAX_REFRESH_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// Minutes between refreshes for a lease of `expires_in_minutes`.
///
/// One minute short of the lease, never negative.
pub fn refresh_period_minutes(expires_in_minutes: i64) -> u64 {
    expires_in_minutes.saturating_sub(1).max(0) as u64
}

/// How long the keep-alive loop waits between refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    period_minutes: u64,
    margin: Duration,
    floor: Duration,
}

impl RefreshSchedule {
    pub fn from_lease(lease: &LeaseTerms, config: &LifecycleConfig) -> Self {
        Self {
            period_minutes: refresh_period_minutes(lease.expires_in_minutes),
            margin: Duration::from_secs(config.refresh_margin_secs),
            floor: Duration::from_secs(config.min_refresh_secs),
        }
    }

    pub fn period_minutes(&self) -> u64 {
        self.period_minutes
    }

    /// `period * 60 + margin` seconds, but never less than the configured floor
    /// and never more than [`MAX_REFRESH_WAIT`].
    ///
    /// The floor keeps a lease of a minute or less from turning the loop into
    /// a busy loop when the margin is configured to zero.
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.period_minutes.saturating_mul(60))
            .saturating_add(self.margin)
            .max(self.floor)
            .min(MAX_REFRESH_WAIT)
    }
}
