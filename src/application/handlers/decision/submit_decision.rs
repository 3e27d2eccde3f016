//! SubmitDecisionHandler - Command handler for recording a new draft.

use std::sync::Arc;

use tracing::info;

use crate::application::errors::EngineError;
use crate::domain::decision::{Decision, DecisionDraft};
use crate::domain::foundation::UserId;
use crate::ports::DecisionRepository;

/// Command to submit a new decision.
#[derive(Debug, Clone)]
pub struct SubmitDecisionCommand {
    pub owner_id: UserId,
    pub draft: DecisionDraft,
}

/// Handler for submitting decisions.
///
/// Creates a DRAFT without contacting the reasoning provider.
pub struct SubmitDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl SubmitDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: SubmitDecisionCommand) -> Result<Decision, EngineError> {
        let decision = Decision::submit(cmd.owner_id, cmd.draft)?;
        let stored = self.repository.create(&decision).await?;

        info!(
            decision_id = %stored.id(),
            user_id = %stored.owner_id(),
            options = stored.options().len(),
            "Decision submitted"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::repository::InMemoryDecisionRepository;
    use crate::domain::decision::fixtures::{job_offer_draft, owner};
    use crate::domain::decision::{Emotion, DEFAULT_OPTION};
    use crate::domain::foundation::DecisionStatus;

    #[tokio::test]
    async fn submit_stores_a_draft() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let handler = SubmitDecisionHandler::new(repo.clone());

        let decision = handler
            .handle(SubmitDecisionCommand {
                owner_id: owner(),
                draft: job_offer_draft(),
            })
            .await
            .unwrap();

        assert_eq!(decision.status(), DecisionStatus::Draft);
        assert!(decision.analysis().is_none());
        assert_eq!(repo.list(&owner()).await.unwrap(), vec![decision]);
    }

    #[tokio::test]
    async fn missing_options_and_emotions_get_defaults() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let handler = SubmitDecisionHandler::new(repo);

        let decision = handler
            .handle(SubmitDecisionCommand {
                owner_id: owner(),
                draft: DecisionDraft::new("Move cities?").with_options(["  "]),
            })
            .await
            .unwrap();

        assert_eq!(decision.options(), [DEFAULT_OPTION]);
        assert_eq!(decision.emotions(), [Emotion::Neutral]);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_and_nothing_stored() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let handler = SubmitDecisionHandler::new(repo.clone());

        let err = handler
            .handle(SubmitDecisionCommand {
                owner_id: owner(),
                draft: DecisionDraft::new("   "),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        assert!(repo.is_empty().await);
    }
}
