//! EndSimulationHandler - closes a simulation and hands back its transcript.

use std::sync::Arc;

use crate::application::errors::EngineError;
use crate::application::simulation::SimulationRegistry;
use crate::domain::foundation::{SimulationId, UserId};
use crate::domain::simulation::Transcript;

#[derive(Debug, Clone)]
pub struct EndSimulationCommand {
    pub owner_id: UserId,
    pub simulation_id: SimulationId,
}

pub struct EndSimulationHandler {
    registry: Arc<SimulationRegistry>,
}

impl EndSimulationHandler {
    pub fn new(registry: Arc<SimulationRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: EndSimulationCommand) -> Result<Transcript, EngineError> {
        self.registry.end(&cmd.owner_id, &cmd.simulation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockReasoningProvider;
    use crate::domain::decision::fixtures::{draft_decision, owner};
    use crate::domain::simulation::SimulationFraming;

    #[tokio::test]
    async fn end_twice_fails_the_second_time() {
        let mock = MockReasoningProvider::new().with_response("Scene");
        let registry = Arc::new(SimulationRegistry::new(Arc::new(mock)));
        let framing = SimulationFraming::for_decision(&draft_decision(), None).unwrap();
        let snapshot = registry.start(&owner(), framing).await;
        let handler = EndSimulationHandler::new(registry.clone());
        let cmd = EndSimulationCommand {
            owner_id: owner(),
            simulation_id: snapshot.id,
        };

        let transcript = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(registry.live_count().await, 0);

        let err = handler.handle(cmd).await.unwrap_err();
        assert!(matches!(err, EngineError::State(_)));
    }
}
