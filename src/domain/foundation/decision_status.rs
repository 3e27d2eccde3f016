//! DecisionStatus enum for tracking the lifecycle of a decision.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a recorded decision.
///
/// Advances strictly `Draft -> Analyzed -> Completed`; there are no
/// regressions and no skipped steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    #[default]
    Draft,
    Analyzed,
    Completed,
}

impl DecisionStatus {
    /// Returns true while the descriptive fields may still change.
    pub fn is_editable(&self) -> bool {
        matches!(self, DecisionStatus::Draft)
    }

    /// Returns true once an analysis is attached.
    pub fn has_analysis(&self) -> bool {
        matches!(self, DecisionStatus::Analyzed | DecisionStatus::Completed)
    }
}

impl StateMachine for DecisionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DecisionStatus::*;
        matches!((self, target), (Draft, Analyzed) | (Analyzed, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DecisionStatus::*;
        match self {
            Draft => vec![Analyzed],
            Analyzed => vec![Completed],
            Completed => vec![],
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionStatus::Draft => "DRAFT",
            DecisionStatus::Analyzed => "ANALYZED",
            DecisionStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rank(status: DecisionStatus) -> u8 {
        match status {
            DecisionStatus::Draft => 0,
            DecisionStatus::Analyzed => 1,
            DecisionStatus::Completed => 2,
        }
    }

    fn any_status() -> impl Strategy<Value = DecisionStatus> {
        prop_oneof![
            Just(DecisionStatus::Draft),
            Just(DecisionStatus::Analyzed),
            Just(DecisionStatus::Completed),
        ]
    }

    #[test]
    fn default_is_draft() {
        assert_eq!(DecisionStatus::default(), DecisionStatus::Draft);
    }

    #[test]
    fn draft_cannot_skip_to_completed() {
        assert!(!DecisionStatus::Draft.can_transition_to(&DecisionStatus::Completed));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(DecisionStatus::Completed.is_terminal());
        assert!(!DecisionStatus::Analyzed.is_terminal());
    }

    #[test]
    fn only_draft_is_editable() {
        assert!(DecisionStatus::Draft.is_editable());
        assert!(!DecisionStatus::Analyzed.is_editable());
        assert!(!DecisionStatus::Completed.is_editable());
    }

    #[test]
    fn serializes_to_screaming_case() {
        assert_eq!(
            serde_json::to_string(&DecisionStatus::Analyzed).unwrap(),
            "\"ANALYZED\""
        );
        let parsed: DecisionStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(parsed, DecisionStatus::Completed);
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(DecisionStatus::Draft.to_string(), "DRAFT");
    }

    proptest! {
        #[test]
        fn every_allowed_transition_advances_by_exactly_one(from in any_status(), to in any_status()) {
            if from.can_transition_to(&to) {
                prop_assert_eq!(rank(to), rank(from) + 1);
            }
        }

        #[test]
        fn no_transition_ever_regresses(from in any_status(), to in any_status()) {
            if rank(to) <= rank(from) {
                prop_assert!(from.transition_to(to).is_err());
            }
        }
    }
}
