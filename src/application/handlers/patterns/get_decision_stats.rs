//! GetDecisionStatsHandler - dashboard figures computed locally.

use std::sync::Arc;

use crate::application::errors::EngineError;
use crate::domain::foundation::UserId;
use crate::domain::patterns::DecisionStats;
use crate::ports::DecisionRepository;

#[derive(Debug, Clone)]
pub struct GetDecisionStatsQuery {
    pub owner_id: UserId,
}

pub struct GetDecisionStatsHandler {
    repository: Arc<dyn DecisionRepository>,
}

impl GetDecisionStatsHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetDecisionStatsQuery) -> Result<DecisionStats, EngineError> {
        let decisions = self.repository.list(&query.owner_id).await?;
        Ok(DecisionStats::compute(&decisions))
    }
}
