use serde::Serialize;
use utoipa::ToSchema;

use super::State;

/// Row-level workflow actions the admin table exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveAction {
    Approve,
    Refuse,
}

/// Success notification emitted after a transition is applied.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Notification {
    #[schema(example = "Time off approved")]
    pub title: String,
    #[schema(example = "The time off request has been approved")]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub state: State,
    pub notification: Notification,
}

/// Applies a workflow action to the current state.
///
/// Approving from `ValidateOne` moves to `ValidateTwo`; approving from any
/// other state also lands on `ValidateTwo`, so the nominal two-step chain
/// collapses into a single effective approval. Refusal is reachable from
/// every state and absorbing. Applying an action whose target state is
/// already reached yields the same state again rather than an error.
pub fn apply(state: State, action: LeaveAction) -> TransitionOutcome {
    match action {
        LeaveAction::Approve => {
            let next = match state {
                State::ValidateOne => State::ValidateTwo,
                _ => State::ValidateTwo,
            };

            TransitionOutcome {
                state: next,
                notification: Notification {
                    title: "Time off approved".to_string(),
                    body: "The time off request has been approved".to_string(),
                },
            }
        }
        LeaveAction::Refuse => TransitionOutcome {
            state: State::Refused,
            notification: Notification {
                title: "Time off refused".to_string(),
                body: "The time off request has been refused".to_string(),
            },
        },
    }
}

/// The approve action is hidden once a request is fully approved.
pub fn can_approve(state: State) -> bool {
    state != State::ValidateTwo
}

/// The refuse action is hidden once a request is refused.
pub fn can_refuse(state: State) -> bool {
    state != State::Refused
}

/// Button label for the approve action: a request sitting in first
/// approval reads "Validate", everything else reads "Approve".
pub fn approve_label(state: State) -> &'static str {
    if state == State::ValidateOne {
        "Validate"
    } else {
        "Approve"
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_approve_from_to_submit_lands_on_validate_two() {
        let outcome = apply(State::ToSubmit, LeaveAction::Approve);
        assert_eq!(outcome.state, State::ValidateTwo);
    }

    #[test]
    fn test_approve_from_any_state_lands_on_validate_two() {
        for state in State::iter() {
            let outcome = apply(state, LeaveAction::Approve);
            assert_eq!(outcome.state, State::ValidateTwo);
        }
    }

    #[test]
    fn test_refuse_from_any_state_lands_on_refused() {
        for state in State::iter() {
            let outcome = apply(state, LeaveAction::Refuse);
            assert_eq!(outcome.state, State::Refused);
        }
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let once = apply(State::ToSubmit, LeaveAction::Approve);
        let twice = apply(once.state, LeaveAction::Approve);
        assert_eq!(once.state, twice.state);

        let once = apply(State::ValidateOne, LeaveAction::Refuse);
        let twice = apply(once.state, LeaveAction::Refuse);
        assert_eq!(once.state, twice.state);
    }

    #[test]
    fn test_every_transition_carries_a_notification() {
        for state in State::iter() {
            for action in [LeaveAction::Approve, LeaveAction::Refuse] {
                let outcome = apply(state, action);
                assert!(!outcome.notification.title.is_empty());
                assert!(!outcome.notification.body.is_empty());
            }
        }
    }

    #[test]
    fn test_approve_hidden_only_when_approved() {
        for state in State::iter() {
            assert_eq!(can_approve(state), state != State::ValidateTwo);
        }
    }

    #[test]
    fn test_refuse_hidden_only_when_refused() {
        for state in State::iter() {
            assert_eq!(can_refuse(state), state != State::Refused);
        }
    }

    #[test]
    fn test_approve_label_reflects_first_approval_stage() {
        assert_eq!(approve_label(State::ValidateOne), "Validate");
        assert_eq!(approve_label(State::ToSubmit), "Approve");
        assert_eq!(approve_label(State::ValidateTwo), "Approve");
        assert_eq!(approve_label(State::Refused), "Approve");
    }
}
