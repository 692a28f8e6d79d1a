//! Announcement keep-alive loop.
//!
//! The controller announces a session, refreshes the listing shortly before
//! each lease runs out, and unlists it once cancelled. Any failure is final:
//! the server drops stale listings by itself, so there is nothing to retry.

use tracing::{debug, info, warn};

use super::cancel::{Pacer, WaitOutcome};
use super::schedule::RefreshSchedule;
use super::state::LifecycleState;
use crate::config::LifecycleConfig;
use crate::directory::{Directory, DirectoryResponse};
use crate::error::{DirectoryError, LifecycleError};
use crate::models::{
    AnnounceReply, LeaseTerms, ListingCredential, RefreshReply, SessionAnnouncement,
    UpdateFields,
};

/// Progress notifications for callers that report to a user.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Announced {
        credential: ListingCredential,
        lease: LeaseTerms,
        refresh_period_minutes: u64,
    },
    Refreshed {
        count: u32,
        message: Option<String>,
    },
    Cancelled,
    Unlisted {
        status: u16,
    },
    /// Cleanup unlist attempted after a failed refresh.
    CleanupUnlist {
        status: Option<u16>,
    },
}

/// Result of a lifecycle that ended with a clean unlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleOutcome {
    pub credential: ListingCredential,
    pub refreshes: u32,
    pub unlist_status: u16,
    pub final_state: LifecycleState,
}

type Observer<'a> = Box<dyn FnMut(&LifecycleEvent) + 'a>;

pub struct LifecycleController<'a, D: Directory, P: Pacer> {
    directory: &'a D,
    pacer: &'a P,
    config: LifecycleConfig,
    state: LifecycleState,
    observer: Option<Observer<'a>>,
}

impl<'a, D: Directory, P: Pacer> LifecycleController<'a, D, P> {
    pub fn new(directory: &'a D, pacer: &'a P, config: LifecycleConfig) -> Self {
        Self {
            directory,
            pacer,
            config,
            state: LifecycleState::Unannounced,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl FnMut(&LifecycleEvent) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Drive one announcement from creation to removal.
    ///
    /// Returns once the pacer reports cancellation and the listing has been
    /// unlisted, or as soon as any step fails.
    pub fn run(
        &mut self,
        session: &SessionAnnouncement,
    ) -> Result<LifecycleOutcome, LifecycleError> {
        let (credential, lease) = self.announce(session)?;
        let schedule = RefreshSchedule::from_lease(&lease, &self.config);

        self.emit(LifecycleEvent::Announced {
            credential: credential.clone(),
            lease,
            refresh_period_minutes: schedule.period_minutes(),
        });

        let refreshes = self.refresh_until_cancelled(&credential, &schedule)?;
        let unlist_status = self.unlist(&credential)?;

        Ok(LifecycleOutcome {
            credential,
            refreshes,
            unlist_status,
            final_state: self.state,
        })
    }

    fn announce(
        &mut self,
        session: &SessionAnnouncement,
    ) -> Result<(ListingCredential, LeaseTerms), LifecycleError> {
        // Checked before the request so a finished controller never creates a listing.
        self.state.try_transition(LifecycleState::Announced)?;
        info!(host = %session.host, port = session.port, "announcing session");

        let response = self.call(|d| d.announce(session))?;
        if !response.is_ok() {
            return Err(self.rejected(response));
        }

        let reply: AnnounceReply = match response.json() {
            Ok(reply) => reply,
            Err(e) => return Err(self.malformed(response, format!("unparseable body: {e}"))),
        };
        let Some(credential) = reply.credential() else {
            let missing = if reply.id.is_none() { "id" } else { "key" };
            return Err(self.malformed(response, format!("missing {missing}")));
        };

        self.transition(LifecycleState::Announced)?;
        let lease = reply.lease(self.config.default_lease_minutes);
        info!(id = %credential.id, expires = lease.expires_in_minutes, "session announced");

        Ok((credential, lease))
    }

    fn refresh_until_cancelled(
        &mut self,
        credential: &ListingCredential,
        schedule: &RefreshSchedule,
    ) -> Result<u32, LifecycleError> {
        self.transition(LifecycleState::Refreshing)?;
        let heartbeat = UpdateFields::new();
        let mut count = 0;

        loop {
            let wait = schedule.wait();
            debug!(id = %credential.id, wait_secs = wait.as_secs(), "waiting for next refresh");

            if self.pacer.pause(wait) == WaitOutcome::Cancelled {
                info!(id = %credential.id, refreshes = count, "refresh loop cancelled");
                self.emit(LifecycleEvent::Cancelled);
                return Ok(count);
            }

            info!(id = %credential.id, "refreshing listing");
            let response = match self
                .directory
                .update(&credential.id, &credential.key, &heartbeat)
            {
                Ok(response) => response,
                Err(source) => {
                    let error = self.transport(source);
                    self.cleanup_after_failed_refresh(credential);
                    return Err(error);
                }
            };

            if !response.is_ok() {
                let error = self.rejected(response);
                self.cleanup_after_failed_refresh(credential);
                return Err(error);
            }

            count += 1;
            let message = response
                .json::<RefreshReply>()
                .ok()
                .and_then(|reply| reply.message)
                .filter(|m| !m.is_empty());
            self.emit(LifecycleEvent::Refreshed { count, message });
        }
    }

    fn unlist(&mut self, credential: &ListingCredential) -> Result<u16, LifecycleError> {
        self.transition(LifecycleState::Unlisting)?;
        info!(id = %credential.id, "unlisting");

        let response = self.call(|d| d.unlist(&credential.id, &credential.key))?;
        if !response.is_ok_or_no_content() {
            return Err(self.rejected(response));
        }

        self.transition(LifecycleState::Terminated)?;
        self.emit(LifecycleEvent::Unlisted {
            status: response.status,
        });
        Ok(response.status)
    }

    /// One unlist attempt after the refresh loop failed, when enabled.
    ///
    /// The outcome is reported but never replaces the refresh error.
    fn cleanup_after_failed_refresh(&mut self, credential: &ListingCredential) {
        if !self.config.unlist_on_refresh_failure {
            return;
        }

        let status = match self.directory.unlist(&credential.id, &credential.key) {
            Ok(response) => {
                if !response.is_ok_or_no_content() {
                    warn!(id = %credential.id, status = response.status, "cleanup unlist rejected");
                }
                Some(response.status)
            }
            Err(e) => {
                warn!(id = %credential.id, error = %e, "cleanup unlist failed");
                None
            }
        };
        self.emit(LifecycleEvent::CleanupUnlist { status });
    }

    fn call<F>(&mut self, request: F) -> Result<DirectoryResponse, LifecycleError>
    where
        F: FnOnce(&D) -> Result<DirectoryResponse, DirectoryError>,
    {
        request(self.directory).map_err(|source| self.transport(source))
    }

    fn transition(&mut self, next: LifecycleState) -> Result<(), LifecycleError> {
        self.state = self.state.try_transition(next)?;
        Ok(())
    }

    /// Record the fault and move to `Error`, returning the state it happened in.
    fn fail(&mut self) -> LifecycleState {
        let at = self.state;
        if at.can_transition_to(&LifecycleState::Error) {
            self.state = LifecycleState::Error;
        }
        at
    }

    fn transport(&mut self, source: DirectoryError) -> LifecycleError {
        let state = self.fail();
        warn!(%state, error = %source, "list server unreachable");
        LifecycleError::Transport { state, source }
    }

    fn rejected(&mut self, response: DirectoryResponse) -> LifecycleError {
        let state = self.fail();
        warn!(%state, status = response.status, "list server rejected request");
        LifecycleError::Rejected {
            state,
            status: response.status,
            body: response.body,
        }
    }

    fn malformed(&mut self, response: DirectoryResponse, reason: String) -> LifecycleError {
        let state = self.fail();
        warn!(%state, %reason, "invalid reply from list server");
        LifecycleError::Malformed {
            state,
            status: response.status,
            body: response.body,
            reason,
        }
    }

    fn emit(&mut self, event: LifecycleEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}
