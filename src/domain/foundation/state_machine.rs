//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state transitions
//! across lifecycle statuses (decisions, simulation sessions).

use super::{DomainError, ErrorCode};

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for DecisionStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Draft, Analyzed) | (Analyzed, Completed))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Draft => vec![Analyzed],
///             Analyzed => vec![Completed],
///             Completed => vec![],
///         }
///     }
/// }
///
/// let next = DecisionStatus::Draft.transition_to(DecisionStatus::Analyzed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning an
    /// `InvalidStateTransition` error if the move is not allowed.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            )
            .with_detail("from", format!("{:?}", self))
            .with_detail("to", format!("{:?}", target)))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Off,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            use Light::*;
            matches!((self, target), (Red, Green) | (Green, Red) | (Red, Off) | (Green, Off))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Light::*;
            match self {
                Red => vec![Green, Off],
                Green => vec![Red, Off],
                Off => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(Light::Red.transition_to(Light::Green).unwrap(), Light::Green);
    }

    #[test]
    fn transition_to_fails_with_state_error_code() {
        let err = Light::Off.transition_to(Light::Red).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(err.details.get("from"), Some(&"Off".to_string()));
        assert_eq!(err.details.get("to"), Some(&"Red".to_string()));
    }

    #[test]
    fn is_terminal_only_for_states_without_exits() {
        assert!(Light::Off.is_terminal());
        assert!(!Light::Red.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [Light::Red, Light::Green, Light::Off] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }
}
