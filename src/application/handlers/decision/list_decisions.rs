//! Query handlers for reading an owner's decisions.

use std::sync::Arc;

use super::load_owned;
use crate::application::errors::EngineError;
use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, UserId};
use crate::ports::DecisionRepository;

/// Query to list an owner's decisions, newest first.
#[derive(Debug, Clone)]
pub struct ListDecisionsQuery {
    pub owner_id: UserId,
}

pub struct ListDecisionsHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl ListDecisionsHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListDecisionsQuery) -> Result<Vec<Decision>, EngineError> {
        Ok(self.repository.list(&query.owner_id).await?)
    }
}

/// Query to fetch one decision.
#[derive(Debug, Clone)]
pub struct GetDecisionQuery {
    pub owner_id: UserId,
    pub decision_id: DecisionId,
}

pub struct GetDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl GetDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetDecisionQuery) -> Result<Decision, EngineError> {
        load_owned(&*self.repository, &query.owner_id, &query.decision_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::repository::InMemoryDecisionRepository;
    use crate::domain::decision::fixtures::{analyzed_decision, draft_decision, owner};

    #[tokio::test]
    async fn list_returns_owner_decisions() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        repo.create(&draft_decision()).await.unwrap();
        repo.create(&analyzed_decision(30)).await.unwrap();

        let handler = ListDecisionsHandler::new(repo);
        let mine = handler
            .handle(ListDecisionsQuery { owner_id: owner() })
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let theirs = handler
            .handle(ListDecisionsQuery {
                owner_id: UserId::new("user-2").unwrap(),
            })
            .await
            .unwrap();
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn get_hides_other_owners_decisions() {
        let repo = Arc::new(InMemoryDecisionRepository::new());
        let decision = draft_decision();
        repo.create(&decision).await.unwrap();
        let handler = GetDecisionHandler::new(repo);

        let found = handler
            .handle(GetDecisionQuery {
                owner_id: owner(),
                decision_id: *decision.id(),
            })
            .await
            .unwrap();
        assert_eq!(found, decision);

        let err = handler
            .handle(GetDecisionQuery {
                owner_id: UserId::new("user-2").unwrap(),
                decision_id: *decision.id(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
