//! Lifecycle state machine for a single request slot.

use thiserror::Error;
use tracing::debug;

/// States the controller moves through for each submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A generation call is outstanding.
    InFlight,
    /// The last call resolved; its result is available.
    Settled,
}

impl RequestState {
    /// Returns `true` while a call is outstanding.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }
}

/// Events that trigger lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    /// A submission was accepted.
    Submit,
    /// The outstanding call returned, successfully or not.
    Resolve,
}

/// Lifecycle state manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    state: RequestState,
}

impl Lifecycle {
    /// Creates a lifecycle in [`RequestState::Idle`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: RequestState::Idle,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RequestState {
        self.state
    }

    /// Applies an event, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] when the event is not
    /// allowed from the current state; the state is left unchanged.
    pub fn transition(&mut self, event: RequestEvent) -> LifecycleResult<RequestState> {
        let next = match (self.state, event) {
            (RequestState::Idle | RequestState::Settled, RequestEvent::Submit) => {
                RequestState::InFlight
            }
            (RequestState::InFlight, RequestEvent::Resolve) => RequestState::Settled,
            (from, event) => return Err(LifecycleError::InvalidTransition { from, event }),
        };

        debug!(from = ?self.state, to = ?next, ?event, "request lifecycle transition");
        self.state = next;
        Ok(next)
    }
}

/// Errors emitted by the lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Transition was not permitted from the current state.
    #[error("invalid request transition from {from:?} via {event:?}")]
    InvalidTransition {
        /// State prior to the attempted transition.
        from: RequestState,
        /// Event that was rejected.
        event: RequestEvent,
    },
}

/// Result alias used for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_resolve_cycle() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), RequestState::Idle);

        lifecycle.transition(RequestEvent::Submit).unwrap();
        assert!(lifecycle.state().is_in_flight());
        lifecycle.transition(RequestEvent::Resolve).unwrap();
        assert_eq!(lifecycle.state(), RequestState::Settled);

        lifecycle.transition(RequestEvent::Submit).unwrap();
        assert_eq!(lifecycle.state(), RequestState::InFlight);
    }

    #[test]
    fn submit_while_in_flight_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.transition(RequestEvent::Submit).unwrap();

        let err = lifecycle
            .transition(RequestEvent::Submit)
            .expect_err("second submit");
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: RequestState::InFlight,
                event: RequestEvent::Submit,
            }
        );
        assert_eq!(lifecycle.state(), RequestState::InFlight);
    }

    #[test]
    fn resolve_requires_in_flight() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.transition(RequestEvent::Resolve).is_err());
        assert_eq!(lifecycle.state(), RequestState::Idle);
    }
}
