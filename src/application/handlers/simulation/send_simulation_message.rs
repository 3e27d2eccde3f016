//! SendSimulationMessageHandler - one user turn in a live simulation.

use std::sync::Arc;

use crate::application::errors::EngineError;
use crate::application::simulation::SimulationRegistry;
use crate::domain::foundation::{SimulationId, UserId};
use crate::domain::simulation::TranscriptEntry;

#[derive(Debug, Clone)]
pub struct SendSimulationMessageCommand {
    pub owner_id: UserId,
    pub simulation_id: SimulationId,
    pub text: String,
}

pub struct SendSimulationMessageHandler {
    registry: Arc<SimulationRegistry>,
}

impl SendSimulationMessageHandler {
    pub fn new(registry: Arc<SimulationRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the assistant entry for this turn, which is synthetic when
    /// the provider could not be reached.
    pub async fn handle(
        &self,
        cmd: SendSimulationMessageCommand,
    ) -> Result<TranscriptEntry, EngineError> {
        self.registry
            .send(&cmd.owner_id, &cmd.simulation_id, &cmd.text)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockReasoningProvider;
    use crate::domain::decision::fixtures::{draft_decision, owner};
    use crate::domain::simulation::{SimulationFraming, Speaker};

    #[tokio::test]
    async fn reply_is_returned_and_recorded() {
        let mock = MockReasoningProvider::new()
            .with_response("Scene")
            .with_response("The manager calls you in.");
        let registry = Arc::new(SimulationRegistry::new(Arc::new(mock)));
        let framing = SimulationFraming::for_decision(&draft_decision(), None).unwrap();
        let snapshot = registry.start(&owner(), framing).await;

        let entry = SendSimulationMessageHandler::new(registry.clone())
            .handle(SendSimulationMessageCommand {
                owner_id: owner(),
                simulation_id: snapshot.id,
                text: "I ask for a raise".into(),
            })
            .await
            .unwrap();

        assert_eq!(entry.speaker, Speaker::Assistant);
        assert_eq!(entry.text, "The manager calls you in.");
        let snapshot = registry.snapshot(&owner(), &snapshot.id).await.unwrap();
        assert_eq!(snapshot.transcript.len(), 3);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let registry = Arc::new(SimulationRegistry::new(Arc::new(
            MockReasoningProvider::new(),
        )));
        let err = SendSimulationMessageHandler::new(registry)
            .handle(SendSimulationMessageCommand {
                owner_id: owner(),
                simulation_id: SimulationId::new(),
                text: "Hello".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
