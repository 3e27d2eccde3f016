//! AnalysisContract - typed provider calls with validated replies.
//!
//! Decision and outcome analysis must succeed to advance a decision, so
//! their failures propagate. Pattern detection is best-effort and always
//! yields a summary.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::errors::EngineError;
use crate::domain::contract::{
    parse_decision_analysis, parse_outcome_analysis, parse_pattern_summary, AnalysisTask,
    DecisionBrief, OutcomeBrief, PatternBrief,
};
use crate::domain::decision::{Decision, DecisionAnalysis, OutcomeAnalysis};
use crate::domain::foundation::UserId;
use crate::domain::patterns::{history_lines, PatternSummary};
use crate::ports::{ReasoningProvider, RequestMetadata, StructuredRequest, StructuredResponse};

/// Provider-agnostic analysis service.
#[derive(Clone)]
pub struct AnalysisContract {
    provider: Arc<dyn ReasoningProvider>,
}

impl AnalysisContract {
    pub fn new(provider: Arc<dyn ReasoningProvider>) -> Self {
        Self { provider }
    }

    /// Analyse a decision's descriptive fields.
    ///
    /// # Errors
    ///
    /// - `ProviderUnavailable` on network or provider failure
    /// - `AnalysisContract` when the reply fails validation
    pub async fn analyze_decision(
        &self,
        brief: DecisionBrief,
        metadata: RequestMetadata,
    ) -> Result<DecisionAnalysis, EngineError> {
        let response = self
            .call(AnalysisTask::DecisionAnalysis(brief), metadata)
            .await?;
        Ok(parse_decision_analysis(&response.content)?)
    }

    /// Review a decision in hindsight given what actually happened.
    ///
    /// # Errors
    ///
    /// - `State` when the decision has no analysis yet
    /// - `Validation` when the outcome text is blank
    /// - `ProviderUnavailable` and `AnalysisContract` as for
    ///   [`Self::analyze_decision`]
    pub async fn analyze_outcome(
        &self,
        decision: &Decision,
        actual_outcome: &str,
        metadata: RequestMetadata,
    ) -> Result<OutcomeAnalysis, EngineError> {
        let brief = OutcomeBrief::from_decision(decision, actual_outcome)?;
        let response = self
            .call(AnalysisTask::OutcomeAnalysis(brief), metadata)
            .await?;
        Ok(parse_outcome_analysis(&response.content)?)
    }

    /// Summarise behaviour across an owner's decisions.
    ///
    /// Never fails: an empty collection gets the fixed insufficient-data
    /// summary without a provider call, and any failure gets a neutral
    /// default.
    pub async fn generate_patterns(&self, owner: &UserId, decisions: &[Decision]) -> PatternSummary {
        if decisions.is_empty() {
            return PatternSummary::insufficient_data();
        }

        let task = AnalysisTask::PatternDetection(PatternBrief {
            history: history_lines(decisions),
        });
        let result = match self.call(task, trace(owner)).await {
            Ok(response) => parse_pattern_summary(&response.content).map_err(EngineError::from),
            Err(err) => Err(err),
        };

        match result {
            Ok(summary) => summary,
            Err(err) => {
                warn!(
                    user_id = %owner,
                    decisions = decisions.len(),
                    error = %err,
                    "Pattern detection failed, using default summary"
                );
                PatternSummary::unavailable()
            }
        }
    }

    async fn call(
        &self,
        task: AnalysisTask,
        metadata: RequestMetadata,
    ) -> Result<StructuredResponse, EngineError> {
        let kind = task.kind();
        let trace_id = metadata.trace_id.clone();
        debug!(task = kind, trace_id = %trace_id, "Calling reasoning provider");

        let response = self
            .provider
            .generate(StructuredRequest::new(task, metadata))
            .await?;

        debug!(
            task = kind,
            trace_id = %trace_id,
            model = %response.model,
            tokens = response.usage.total_tokens,
            "Reasoning provider replied"
        );
        Ok(response)
    }
}

/// Fresh request metadata for an owner.
pub fn trace(owner: &UserId) -> RequestMetadata {
    RequestMetadata::new(owner.clone(), Uuid::new_v4().to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn analysis_json(clarity: i64) -> Value {
        json!({
            "summary": "A career move weighed against stability.",
            "biases": [{
                "name": "Status Quo Bias",
                "description": "Preferring the current job because it is familiar.",
                "probability": 70,
                "mitigation": "List what you would lose by staying."
            }],
            "blindSpots": ["Long-term salary growth"],
            "alternativePerspectives": ["Negotiate a later start date"],
            "simulations": [
                {
                    "scenario": "Accept the offer",
                    "outcome": "Faster growth with more risk.",
                    "riskLevel": "Medium"
                },
                {
                    "scenario": "Decline the offer",
                    "outcome": "Stable but flat trajectory.",
                    "riskLevel": "Low"
                }
            ],
            "clarityScore": clarity,
            "relatedTags": ["career", "risk"]
        })
    }

    pub fn outcome_json(updated: i64) -> Value {
        json!({
            "causalReflection": "Preparation mattered more than the offer itself.",
            "biasValidation": "Status quo bias showed up in the first month.",
            "learningPoint": "Price in hidden time costs.",
            "updatedClarityScore": updated
        })
    }

    pub fn pattern_json() -> Value {
        json!({
            "insight": "You tend to stay put under pressure.",
            "dominantBias": "Status Quo Bias",
            "recommendation": "Write down the cost of not changing."
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::adapters::ai::{MockCall, MockError, MockReasoningProvider};
    use crate::domain::decision::fixtures::{analyzed_decision, draft_decision, owner};

    fn contract(mock: &MockReasoningProvider) -> AnalysisContract {
        AnalysisContract::new(Arc::new(mock.clone()))
    }

    fn brief() -> DecisionBrief {
        DecisionBrief::from_decision(&draft_decision()).unwrap()
    }

    #[tokio::test]
    async fn analyze_decision_returns_validated_analysis() {
        let mock = MockReasoningProvider::new().with_json_response(analysis_json(72));
        let analysis = contract(&mock)
            .analyze_decision(brief(), trace(&owner()))
            .await
            .unwrap();

        assert_eq!(analysis.clarity_score().value(), 72);
        assert_eq!(analysis.related_tags(), ["career", "risk"]);
        assert!(matches!(
            &mock.get_calls()[0],
            MockCall::Generate { task: AnalysisTask::DecisionAnalysis(_) }
        ));
    }

    #[tokio::test]
    async fn out_of_range_clarity_is_contract_error() {
        let mock = MockReasoningProvider::new().with_json_response(analysis_json(150));
        let err = contract(&mock)
            .analyze_decision(brief(), trace(&owner()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AnalysisContract(_)));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let mock = MockReasoningProvider::new().with_error(MockError::Unavailable {
            message: "503".into(),
        });
        let err = contract(&mock)
            .analyze_decision(brief(), trace(&owner()))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn analyze_outcome_requires_analysis() {
        let mock = MockReasoningProvider::new();
        let err = contract(&mock)
            .analyze_outcome(&draft_decision(), "It worked out", trace(&owner()))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::State(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn analyze_outcome_rejects_blank_text_before_calling() {
        let mock = MockReasoningProvider::new();
        let err = contract(&mock)
            .analyze_outcome(&analyzed_decision(50), "   ", trace(&owner()))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn analyze_outcome_returns_updated_score() {
        let mock = MockReasoningProvider::new().with_json_response(outcome_json(88));
        let outcome = contract(&mock)
            .analyze_outcome(&analyzed_decision(50), "It worked out", trace(&owner()))
            .await
            .unwrap();
        assert_eq!(outcome.updated_clarity_score.value(), 88);
    }

    #[tokio::test]
    async fn empty_collection_skips_provider() {
        let mock = MockReasoningProvider::new();
        let summary = contract(&mock).generate_patterns(&owner(), &[]).await;

        assert_eq!(summary, PatternSummary::insufficient_data());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn patterns_are_parsed() {
        let mock = MockReasoningProvider::new().with_json_response(pattern_json());
        let summary = contract(&mock)
            .generate_patterns(&owner(), &[analyzed_decision(40)])
            .await;
        assert_eq!(summary.dominant_bias, "Status Quo Bias");
    }

    #[tokio::test]
    async fn pattern_failures_degrade_to_default() {
        let mock = MockReasoningProvider::new()
            .with_error(MockError::Network {
                message: "reset".into(),
            })
            .with_response("not json");
        let contract = contract(&mock);
        let decisions = [draft_decision()];

        assert_eq!(
            contract.generate_patterns(&owner(), &decisions).await,
            PatternSummary::unavailable()
        );
        assert_eq!(
            contract.generate_patterns(&owner(), &decisions).await,
            PatternSummary::unavailable()
        );
    }

    #[tokio::test]
    async fn pattern_request_carries_history_lines() {
        let mock = MockReasoningProvider::new().with_json_response(pattern_json());
        contract(&mock)
            .generate_patterns(&owner(), &[analyzed_decision(40)])
            .await;

        match &mock.get_calls()[0] {
            MockCall::Generate {
                task: AnalysisTask::PatternDetection(brief),
            } => {
                assert_eq!(brief.history.len(), 1);
                assert!(brief.history[0].contains("Bias Found: Status Quo Bias"));
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }
}
