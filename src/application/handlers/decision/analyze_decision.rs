//! AnalyzeDecisionHandler - Command handler that runs the decision analysis.
//!
//! The provider call happens before the aggregate is touched, so a failed
//! or invalid reply leaves the stored draft exactly as it was and the user
//! can retry.

use std::sync::Arc;

use tracing::info;

use super::load_owned;
use crate::application::contract::{trace, AnalysisContract};
use crate::application::errors::EngineError;
use crate::domain::contract::DecisionBrief;
use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DecisionStatus, StateMachine, UserId};
use crate::ports::DecisionRepository;

/// Command to analyse a draft decision.
#[derive(Debug, Clone)]
pub struct AnalyzeDecisionCommand {
    pub owner_id: UserId,
    pub decision_id: DecisionId,
}

/// Handler for analysing decisions.
pub struct AnalyzeDecisionHandler {
    repository: Arc<dyn DecisionRepository>,
    contract: AnalysisContract,
}

impl AnalyzeDecisionHandler {
    pub fn new(repository: Arc<dyn DecisionRepository>, contract: AnalysisContract) -> Self {
        Self {
            repository,
            contract,
        }
    }

    pub async fn handle(&self, cmd: AnalyzeDecisionCommand) -> Result<Decision, EngineError> {
        // 1. Load and check the decision can still be analysed
        let mut decision = load_owned(&*self.repository, &cmd.owner_id, &cmd.decision_id).await?;
        decision.status().transition_to(DecisionStatus::Analyzed)?;

        // 2. Ask the provider
        let brief = DecisionBrief::from_decision(&decision)?;
        let metadata = trace(&cmd.owner_id).for_decision(cmd.decision_id);
        let analysis = self.contract.analyze_decision(brief, metadata).await?;

        // 3. Apply and persist, unless a concurrent analysis got there first
        decision.complete_analysis(analysis)?;
        let stored = self
            .repository
            .update(&decision, DecisionStatus::Draft)
            .await?;

        info!(
            decision_id = %stored.id(),
            clarity_score = stored.clarity_score().map(|s| s.value()).unwrap_or_default(),
            biases = stored.analysis().map(|a| a.biases().len()).unwrap_or_default(),
            "Decision analyzed"
        );
        Ok(stored)
    }
}
