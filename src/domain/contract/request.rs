//! Request shapes sent to a reasoning provider.
//!
//! Requests carry structured fields only. How a provider phrases them is
//! its own concern.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema;
use crate::domain::decision::{Decision, Emotion};
use crate::domain::foundation::{ClarityScore, DomainError, ValidationError};

/// Descriptive fields of a decision as sent for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionBrief {
    pub title: String,
    pub description: String,
    pub context: String,
    pub emotions: Vec<Emotion>,
    pub options: Vec<String>,
}

impl DecisionBrief {
    /// Builds a brief, checking the analysis preconditions.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for a blank title
    /// - `OutOfRange` when there are no options or no emotions
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        context: impl Into<String>,
        emotions: Vec<Emotion>,
        options: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if options.is_empty() {
            return Err(ValidationError::out_of_range("options", 1, i32::MAX, 0));
        }
        if emotions.is_empty() {
            return Err(ValidationError::out_of_range("emotions", 1, i32::MAX, 0));
        }
        Ok(Self {
            title,
            description: description.into(),
            context: context.into(),
            emotions,
            options,
        })
    }

    pub fn from_decision(decision: &Decision) -> Result<Self, ValidationError> {
        Self::new(
            decision.title(),
            decision.description(),
            decision.context(),
            decision.emotions().to_vec(),
            decision.options().to_vec(),
        )
    }
}

/// Original analysis plus the real outcome, for hindsight review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeBrief {
    pub title: String,
    pub description: String,
    pub predicted_biases: Vec<String>,
    pub original_clarity_score: ClarityScore,
    pub actual_outcome: String,
}

impl OutcomeBrief {
    /// # Errors
    ///
    /// - `DecisionNotAnalyzed` when the decision carries no analysis
    /// - `EmptyField` when the outcome text is blank
    pub fn from_decision(decision: &Decision, actual_outcome: &str) -> Result<Self, DomainError> {
        let analysis = decision.require_analysis()?;
        let actual_outcome = actual_outcome.trim();
        if actual_outcome.is_empty() {
            return Err(ValidationError::empty_field("outcome").into());
        }
        Ok(Self {
            title: decision.title().to_string(),
            description: decision.description().to_string(),
            predicted_biases: analysis.biases().iter().map(|b| b.name.clone()).collect(),
            original_clarity_score: analysis.clarity_score(),
            actual_outcome: actual_outcome.to_string(),
        })
    }
}

/// One history line per decision, oldest data included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternBrief {
    pub history: Vec<String>,
}

/// The three structured tasks a provider can be asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", content = "input", rename_all = "snake_case")]
pub enum AnalysisTask {
    DecisionAnalysis(DecisionBrief),
    OutcomeAnalysis(OutcomeBrief),
    PatternDetection(PatternBrief),
}

impl AnalysisTask {
    /// Short name used in logs and usage records.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisTask::DecisionAnalysis(_) => "decision_analysis",
            AnalysisTask::OutcomeAnalysis(_) => "outcome_analysis",
            AnalysisTask::PatternDetection(_) => "pattern_detection",
        }
    }

    /// Response schema the provider must follow for this task.
    pub fn response_schema(&self) -> &'static Value {
        match self {
            AnalysisTask::DecisionAnalysis(_) => &schema::DECISION_ANALYSIS_SCHEMA,
            AnalysisTask::OutcomeAnalysis(_) => &schema::OUTCOME_ANALYSIS_SCHEMA,
            AnalysisTask::PatternDetection(_) => &schema::PATTERN_SUMMARY_SCHEMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::fixtures::{analyzed_decision, draft_decision};
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn brief_requires_options_and_emotions() {
        let no_options = DecisionBrief::new("t", "", "", vec![Emotion::Neutral], vec![]);
        assert!(matches!(no_options, Err(ValidationError::OutOfRange { ref field, .. }) if field == "options"));

        let no_emotions = DecisionBrief::new("t", "", "", vec![], vec!["A".into()]);
        assert!(no_emotions.is_err());
    }

    #[test]
    fn brief_from_submitted_decision_is_valid() {
        let brief = DecisionBrief::from_decision(&draft_decision()).unwrap();
        assert_eq!(brief.options, vec!["Accept", "Decline"]);
        assert_eq!(brief.emotions, vec![Emotion::Anxious]);
    }

    #[test]
    fn outcome_brief_needs_analysis() {
        let err = OutcomeBrief::from_decision(&draft_decision(), "It worked").unwrap_err();
        assert_eq!(err.code, ErrorCode::DecisionNotAnalyzed);
    }

    #[test]
    fn outcome_brief_carries_predicted_biases() {
        let brief = OutcomeBrief::from_decision(&analyzed_decision(55), " It worked ").unwrap();
        assert_eq!(brief.predicted_biases, vec!["Status Quo Bias"]);
        assert_eq!(brief.original_clarity_score.value(), 55);
        assert_eq!(brief.actual_outcome, "It worked");
    }

    #[test]
    fn each_task_has_its_own_schema() {
        let task = AnalysisTask::PatternDetection(PatternBrief { history: vec![] });
        assert_eq!(task.kind(), "pattern_detection");
        assert!(task.response_schema()["properties"].get("insight").is_some());
    }
}
