//! StartSimulationHandler - opens a what-if conversation for a decision.

use std::sync::Arc;

use crate::application::errors::EngineError;
use crate::application::handlers::decision::load_owned;
use crate::application::simulation::{SimulationRegistry, SimulationSnapshot};
use crate::domain::foundation::{DecisionId, UserId};
use crate::domain::simulation::SimulationFraming;
use crate::ports::DecisionRepository;

/// Command to start a simulation.
///
/// A scenario must name one of the decision's simulated paths; without one
/// the session explores outcomes generically.
#[derive(Debug, Clone)]
pub struct StartSimulationCommand {
    pub owner_id: UserId,
    pub decision_id: DecisionId,
    pub scenario: Option<String>,
}

pub struct StartSimulationHandler {
    repository: Arc<dyn DecisionRepository>,
    registry: Arc<SimulationRegistry>,
}

impl StartSimulationHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>, registry: Arc<SimulationRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Provider trouble does not fail this call; the session comes back
    /// degraded instead.
    pub async fn handle(
        &self,
        cmd: StartSimulationCommand,
    ) -> Result<SimulationSnapshot, EngineError> {
        let decision = load_owned(&*self.repository, &cmd.owner_id, &cmd.decision_id).await?;
        let framing = SimulationFraming::for_decision(&decision, cmd.scenario.as_deref())?;
        Ok(self.registry.start(&cmd.owner_id, framing).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockCall, MockReasoningProvider};
    use crate::adapters::repository::InMemoryDecisionRepository;
    use crate::domain::decision::fixtures::{analyzed_decision, owner};
    use crate::domain::simulation::Speaker;

    async fn setup(mock: &MockReasoningProvider) -> (StartSimulationHandler, DecisionId) {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let decision = analyzed_decision(60);
        repo.create(&decision).await.unwrap();
        let registry = Arc::new(SimulationRegistry::new(Arc::new(mock.clone())));
        (StartSimulationHandler::new(repo, registry), *decision.id())
    }

    #[tokio::test]
    async fn scenario_is_passed_to_the_framing() {
        let mock = MockReasoningProvider::new().with_response("Day one at the startup.");
        let (handler, decision_id) = setup(&mock).await;

        let snapshot = handler
            .handle(StartSimulationCommand {
                owner_id: owner(),
                decision_id,
                scenario: Some("Accept the offer".into()),
            })
            .await
            .unwrap();

        assert_eq!(snapshot.scenario.as_deref(), Some("Accept the offer"));
        assert_eq!(snapshot.transcript.speakers(), vec![Speaker::Assistant]);
        match &mock.get_calls()[0] {
            MockCall::OpenChat { framing } => {
                assert_eq!(framing.scenario.as_deref(), Some("Accept the offer"))
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_scenario_is_rejected() {
        let mock = MockReasoningProvider::new();
        let (handler, decision_id) = setup(&mock).await;

        let err = handler
            .handle(StartSimulationCommand {
                owner_id: owner(),
                decision_id,
                scenario: Some("Move to Mars".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_decision_is_not_found() {
        let mock = MockReasoningProvider::new();
        let (handler, _) = setup(&mock).await;

        let err = handler
            .handle(StartSimulationCommand {
                owner_id: owner(),
                decision_id: DecisionId::new(),
                scenario: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
