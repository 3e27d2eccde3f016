//! GeneratePatternsHandler - Query handler for the cross-decision summary.
//!
//! Best-effort: provider trouble yields a neutral summary. Only a storage
//! failure while reading the collection is reported.

use std::sync::Arc;

use crate::application::contract::AnalysisContract;
use crate::application::errors::EngineError;
use crate::domain::foundation::UserId;
use crate::domain::patterns::PatternSummary;
use crate::ports::DecisionRepository;

#[derive(Debug, Clone)]
pub struct GeneratePatternsQuery {
    pub owner_id: UserId,
}

pub struct GeneratePatternsHandler {
    repository: Arc<dyn DecisionRepository>,
    contract: AnalysisContract,
}

impl GeneratePatternsHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>, contract: AnalysisContract) -> Self {
        Self {
            repository,
            contract,
        }
    }

    pub async fn handle(&self, query: GeneratePatternsQuery) -> Result<PatternSummary, EngineError> {
        let decisions = self.repository.list(&query.owner_id).await?;
        Ok(self
            .contract
            .generate_patterns(&query.owner_id, &decisions)
            .await)
    }
}
