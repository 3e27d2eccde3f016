//! SimulationStatus enum for tracking the lifecycle of a simulation session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a live simulation session.
///
/// `Degraded` means the last provider exchange failed; the session still
/// accepts input so the user can try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    #[default]
    Active,
    Degraded,
    Ended,
}

impl SimulationStatus {
    /// Returns true if the session still accepts user turns.
    pub fn accepts_input(&self) -> bool {
        !matches!(self, SimulationStatus::Ended)
    }
}

impl StateMachine for SimulationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SimulationStatus::*;
        matches!(
            (self, target),
            (Active, Degraded) | (Degraded, Active) | (Active, Ended) | (Degraded, Ended)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SimulationStatus::*;
        match self {
            Active => vec![Degraded, Ended],
            Degraded => vec![Active, Ended],
            Ended => vec![],
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimulationStatus::Active => "Active",
            SimulationStatus::Degraded => "Degraded",
            SimulationStatus::Ended => "Ended",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SimulationStatus::default(), SimulationStatus::Active);
    }

    #[test]
    fn degraded_can_recover() {
        assert!(SimulationStatus::Degraded.can_transition_to(&SimulationStatus::Active));
        assert!(SimulationStatus::Active.can_transition_to(&SimulationStatus::Degraded));
    }

    #[test]
    fn ended_is_absorbing() {
        assert!(SimulationStatus::Ended.is_terminal());
        assert!(SimulationStatus::Ended
            .transition_to(SimulationStatus::Active)
            .is_err());
        assert!(!SimulationStatus::Ended.accepts_input());
    }

    #[test]
    fn display_works_correctly() {
        assert_eq!(format!("{}", SimulationStatus::Degraded), "Degraded");
    }
}
