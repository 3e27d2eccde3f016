//! System framing that primes a simulation conversation.

use serde::{Deserialize, Serialize};

use crate::domain::decision::{Decision, Emotion};
use crate::domain::foundation::{DecisionId, DomainError};

/// First message sent on a new conversation.
pub const OPENING_TURN: &str = "Begin the simulation. Set the scene for me based on the scenario.";

/// Shown when the opening reply comes back empty.
pub const EMPTY_OPENING_FALLBACK: &str = "Simulation ready. What would you like to do?";

/// Synthetic reply when the conversation could not be started.
pub const START_FAILURE_MESSAGE: &str =
    "Failed to connect to the simulation engine. Please try again.";

/// Synthetic reply when a turn could not be completed.
pub const SEND_FAILURE_MESSAGE: &str =
    "Connection interrupted. Send your message again to continue the simulation.";

/// Decision context plus the optional focus scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationFraming {
    pub decision_id: DecisionId,
    pub title: String,
    pub description: String,
    pub context: String,
    pub emotions: Vec<Emotion>,
    pub options: Vec<String>,
    pub scenario: Option<String>,
}

impl SimulationFraming {
    /// Builds the framing for a decision.
    ///
    /// A blank scenario means generic exploration.
    ///
    /// # Errors
    ///
    /// - `DecisionNotAnalyzed` if a scenario is given for an unanalysed decision
    /// - `ValidationFailed` if the scenario is not one of its simulated paths
    pub fn for_decision(decision: &Decision, scenario: Option<&str>) -> Result<Self, DomainError> {
        let scenario = match scenario.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Some(decision.resolve_scenario(s)?.scenario.clone()),
            None => None,
        };
        Ok(Self {
            decision_id: *decision.id(),
            title: decision.title().to_string(),
            description: decision.description().to_string(),
            context: decision.context().to_string(),
            emotions: decision.emotions().to_vec(),
            options: decision.options().to_vec(),
            scenario,
        })
    }
}
