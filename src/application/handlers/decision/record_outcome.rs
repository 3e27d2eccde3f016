//! RecordOutcomeHandler - Command handler for closing a decision with its
//! real-world outcome.

use std::sync::Arc;

use tracing::info;

use super::load_owned;
use crate::application::contract::{trace, AnalysisContract};
use crate::application::errors::EngineError;
use crate::domain::decision::Decision;
use crate::domain::foundation::{ClarityScore, DecisionId, DecisionStatus, UserId};
use crate::ports::DecisionRepository;

/// Command to record what actually happened.
#[derive(Debug, Clone)]
pub struct RecordOutcomeCommand {
    pub owner_id: UserId,
    pub decision_id: DecisionId,
    pub outcome: String,
}

/// Result of recording an outcome.
#[derive(Debug, Clone)]
pub struct RecordOutcomeResult {
    pub decision: Decision,
    /// Clarity score before the hindsight review replaced it.
    pub previous_clarity: ClarityScore,
}

/// Handler for recording outcomes.
pub struct RecordOutcomeHandler {
    repository: Arc<dyn DecisionRepository>,
    contract: AnalysisContract,
}

impl RecordOutcomeHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>, contract: AnalysisContract) -> Self {
        Self {
            repository,
            contract,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordOutcomeCommand,
    ) -> Result<RecordOutcomeResult, EngineError> {
        let mut decision = load_owned(&*self.repository, &cmd.owner_id, &cmd.decision_id).await?;
        decision.ensure_outcome_recordable()?;

        let metadata = trace(&cmd.owner_id).for_decision(cmd.decision_id);
        let outcome_analysis = self
            .contract
            .analyze_outcome(&decision, &cmd.outcome, metadata)
            .await?;

        let previous_clarity = decision.record_outcome(&cmd.outcome, outcome_analysis)?;
        let decision = self
            .repository
            .update(&decision, DecisionStatus::Analyzed)
            .await?;

        info!(
            decision_id = %decision.id(),
            previous_clarity = previous_clarity.value(),
            updated_clarity = decision.clarity_score().map(|s| s.value()).unwrap_or_default(),
            "Decision outcome recorded"
        );
        Ok(RecordOutcomeResult {
            decision,
            previous_clarity,
        })
    }
}
