use crate::error::LifecycleError;

/// Where a listing is in its announce → refresh → unlist lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Unannounced,
    Announced,
    Refreshing,
    Unlisting,
    Terminated,
    Error,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Unannounced => write!(f, "Unannounced"),
            LifecycleState::Announced => write!(f, "Announced"),
            LifecycleState::Refreshing => write!(f, "Refreshing"),
            LifecycleState::Unlisting => write!(f, "Unlisting"),
            LifecycleState::Terminated => write!(f, "Terminated"),
            LifecycleState::Error => write!(f, "Error"),
        }
    }
}

impl LifecycleState {
    /// Check if transitioning from the current state to `next` is valid.
    ///
    /// Valid transitions:
    /// - `Unannounced` -> `Announced`
    /// - `Announced` -> `Refreshing`
    /// - `Refreshing` -> `Unlisting`
    /// - `Unlisting` -> `Terminated`
    /// - any non-terminal state -> `Error`
    ///
    /// Staying in the same state is always allowed.
    pub fn can_transition_to(&self, next: &LifecycleState) -> bool {
        if self == next {
            return true;
        }

        if !self.is_terminal() && *next == LifecycleState::Error {
            return true;
        }

        matches!(
            (self, next),
            (LifecycleState::Unannounced, LifecycleState::Announced)
                | (LifecycleState::Announced, LifecycleState::Refreshing)
                | (LifecycleState::Refreshing, LifecycleState::Unlisting)
                | (LifecycleState::Unlisting, LifecycleState::Terminated)
        )
    }

    pub fn try_transition(&self, next: LifecycleState) -> Result<LifecycleState, LifecycleError> {
        if self.can_transition_to(&next) {
            Ok(next)
        } else {
            Err(LifecycleError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }

    pub fn valid_transitions(&self) -> Vec<LifecycleState> {
        match self {
            LifecycleState::Unannounced => {
                vec![LifecycleState::Announced, LifecycleState::Error]
            }
            LifecycleState::Announced => {
                vec![LifecycleState::Refreshing, LifecycleState::Error]
            }
            LifecycleState::Refreshing => {
                vec![LifecycleState::Unlisting, LifecycleState::Error]
            }
            LifecycleState::Unlisting => {
                vec![LifecycleState::Terminated, LifecycleState::Error]
            }
            LifecycleState::Terminated | LifecycleState::Error => vec![],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Terminated | LifecycleState::Error)
    }
}
