//! DeleteDecisionHandler - Command handler for removing a decision.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::domain::foundation::{DecisionId, UserId};
use crate::ports::DecisionRepository;

#[derive(Debug, Clone)]
pub struct DeleteDecisionCommand {
    pub owner_id: UserId,
    pub decision_id: DecisionId,
}

pub struct DeleteDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl DeleteDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteDecisionCommand) -> Result<(), EngineError> {
        self.repository
            .delete(&cmd.owner_id, &cmd.decision_id)
            .await?;
        info!(decision_id = %cmd.decision_id, "Decision deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::repository::InMemoryDecisionRepository;
    use crate::domain::decision::fixtures::{draft_decision, owner};

    #[tokio::test]
    async fn owner_can_delete() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let decision = draft_decision();
        repo.create(&decision).await.unwrap();

        DeleteDecisionHandler::new(repo.clone())
            .handle(DeleteDecisionCommand {
                owner_id: owner(),
                decision_id: *decision.id(),
            })
            .await
            .unwrap();
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn other_owner_gets_not_found() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let decision = draft_decision();
        repo.create(&decision).await.unwrap();

        let err = DeleteDecisionHandler::new(repo.clone())
            .handle(DeleteDecisionCommand {
                owner_id: UserId::new("user-2").unwrap(),
                decision_id: *decision.id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::NotFound(_)));
        assert_eq!(repo.len().await, 1);
    }
}
