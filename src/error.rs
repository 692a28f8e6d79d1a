//! Error types for the directory client and the announcement lifecycle.

use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Failure to talk to the list server at all.
///
/// Non-2xx responses are not errors at this level; they come back as an
/// ordinary [`DirectoryResponse`](crate::directory::DirectoryResponse).
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid list server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("failed to encode {operation} request body")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} request failed")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// How a lifecycle step went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The request could not be sent or the response not received.
    Transport,
    /// The server answered with a status other than the expected one.
    Protocol,
    /// The server answered with success but the body lacked required data.
    MalformedResponse,
    /// The controller was asked to make a transition its state does not allow.
    InvalidTransition,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{state}: could not reach list server")]
    Transport {
        state: LifecycleState,
        #[source]
        source: DirectoryError,
    },

    #[error("{state}: list server returned HTTP {status}")]
    Rejected {
        state: LifecycleState,
        status: u16,
        body: String,
    },

    #[error("{state}: invalid reply from list server ({reason})")]
    Malformed {
        state: LifecycleState,
        status: u16,
        body: String,
        reason: String,
    },

    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}

impl LifecycleError {
    pub fn fault(&self) -> FaultKind {
        match self {
            LifecycleError::Transport { .. } => FaultKind::Transport,
            LifecycleError::Rejected { .. } => FaultKind::Protocol,
            LifecycleError::Malformed { .. } => FaultKind::MalformedResponse,
            LifecycleError::InvalidTransition { .. } => FaultKind::InvalidTransition,
        }
    }

    /// The raw response body, when the server sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            LifecycleError::Rejected { body, .. } | LifecycleError::Malformed { body, .. } => {
                Some(body)
            }
            _ => None,
        }
    }

    /// The state the controller was in when the fault happened.
    pub fn state(&self) -> LifecycleState {
        match self {
            LifecycleError::Transport { state, .. }
            | LifecycleError::Rejected { state, .. }
            | LifecycleError::Malformed { state, .. } => *state,
            LifecycleError::InvalidTransition { from, .. } => *from,
        }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("at least one listing is required for an update")]
    Empty,

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
