//! Decision aggregate entity.
//!
//! A decision moves through `DRAFT -> ANALYZED -> COMPLETED`. The aggregate
//! only accepts results produced elsewhere; it never talks to a provider,
//! which keeps every transition free of I/O.
//!
//! # Lockstep fields
//!
//! - `analysis` and `tags` are set exactly when entering `ANALYZED`
//! - `outcome`, `outcome_date` and `outcome_analysis` are set exactly when
//!   entering `COMPLETED`, together with the clarity overwrite

use serde::{Deserialize, Serialize};

use super::analysis::{DecisionAnalysis, OutcomeAnalysis, SimulatedOutcome};
use super::draft::DecisionDraft;
use super::emotion::Emotion;
use crate::domain::foundation::{
    ClarityScore, DecisionId, DecisionStatus, DomainError, ErrorCode, StateMachine, Timestamp,
    UserId, ValidationError,
};

/// Decision aggregate - one recorded choice owned by one person.
///
/// # Invariants
///
/// - `id` and `owner_id` never change after submission
/// - `title` is non-empty, `options` and `emotions` hold at least one entry
/// - `options` and `emotions` are frozen once analysed
/// - status only advances, never regresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    id: DecisionId,
    owner_id: UserId,
    title: String,
    description: String,
    context: String,
    options: Vec<String>,
    emotions: Vec<Emotion>,
    status: DecisionStatus,
    analysis: Option<DecisionAnalysis>,
    outcome: Option<String>,
    outcome_date: Option<Timestamp>,
    outcome_analysis: Option<OutcomeAnalysis>,
    tags: Vec<String>,
    date_created: Option<Timestamp>,
    /// When the draft was submitted; used to order undated drafts.
    submitted_at: Timestamp,
}

impl Decision {
    /// Creates a new DRAFT decision from caller input.
    ///
    /// No network calls happen here.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank
    pub fn submit(owner_id: UserId, draft: DecisionDraft) -> Result<Self, DomainError> {
        let fields = draft.normalize()?;
        Ok(Self {
            id: DecisionId::new(),
            owner_id,
            title: fields.title,
            description: fields.description,
            context: fields.context,
            options: fields.options,
            emotions: fields.emotions,
            status: DecisionStatus::Draft,
            analysis: None,
            outcome: None,
            outcome_date: None,
            outcome_analysis: None,
            tags: Vec::new(),
            date_created: fields.date_created,
            submitted_at: Timestamp::now(),
        })
    }

    /// Reconstitute a decision from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DecisionId,
        owner_id: UserId,
        title: String,
        description: String,
        context: String,
        options: Vec<String>,
        emotions: Vec<Emotion>,
        status: DecisionStatus,
        analysis: Option<DecisionAnalysis>,
        outcome: Option<String>,
        outcome_date: Option<Timestamp>,
        outcome_analysis: Option<OutcomeAnalysis>,
        tags: Vec<String>,
        date_created: Option<Timestamp>,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            description,
            context,
            options,
            emotions,
            status,
            analysis,
            outcome,
            outcome_date,
            outcome_analysis,
            tags,
            date_created,
            submitted_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DecisionId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn emotions(&self) -> &[Emotion] {
        &self.emotions
    }

    pub fn status(&self) -> DecisionStatus {
        self.status
    }

    pub fn analysis(&self) -> Option<&DecisionAnalysis> {
        self.analysis.as_ref()
    }

    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    pub fn outcome_date(&self) -> Option<&Timestamp> {
        self.outcome_date.as_ref()
    }

    pub fn outcome_analysis(&self) -> Option<&OutcomeAnalysis> {
        self.outcome_analysis.as_ref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn date_created(&self) -> Option<&Timestamp> {
        self.date_created.as_ref()
    }

    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }

    /// Timestamp used for newest-first ordering.
    pub fn sort_key(&self) -> Timestamp {
        self.date_created.unwrap_or(self.submitted_at)
    }

    /// Current clarity score, if analysed.
    pub fn clarity_score(&self) -> Option<ClarityScore> {
        self.analysis.as_ref().map(DecisionAnalysis::clarity_score)
    }

    /// Name of the top-ranked bias, if the analysis found any.
    pub fn dominant_bias(&self) -> Option<&str> {
        self.analysis
            .as_ref()
            .and_then(DecisionAnalysis::top_bias)
            .map(|b| b.name.as_str())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// # Errors
    ///
    /// - `Forbidden` if user is not the owner
    pub fn authorize(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User is not authorized to access this decision",
            ))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preconditions
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the analysis or a precondition error.
    ///
    /// # Errors
    ///
    /// - `DecisionNotAnalyzed` while the decision is still a draft
    pub fn require_analysis(&self) -> Result<&DecisionAnalysis, DomainError> {
        self.analysis.as_ref().ok_or_else(|| {
            DomainError::new(
                ErrorCode::DecisionNotAnalyzed,
                "Decision has no analysis yet",
            )
            .with_detail("decision_id", self.id.to_string())
        })
    }

    /// Checks that an outcome may be recorded, before any provider work.
    ///
    /// # Errors
    ///
    /// - `DecisionNotAnalyzed` for a draft
    /// - `InvalidStateTransition` once completed
    pub fn ensure_outcome_recordable(&self) -> Result<(), DomainError> {
        match self.status {
            DecisionStatus::Draft => Err(DomainError::new(
                ErrorCode::DecisionNotAnalyzed,
                "Cannot record an outcome before the decision is analyzed",
            )
            .with_detail("decision_id", self.id.to_string())),
            _ => self
                .status
                .transition_to(DecisionStatus::Completed)
                .map(|_| ()),
        }
    }

    /// Resolves a scenario handle against this decision's analysis.
    ///
    /// # Errors
    ///
    /// - `DecisionNotAnalyzed` if there is no analysis to draw from
    /// - `ValidationFailed` if the scenario is not one of the simulated paths
    pub fn resolve_scenario(&self, scenario: &str) -> Result<&SimulatedOutcome, DomainError> {
        self.require_analysis()?
            .find_scenario(scenario)
            .ok_or_else(|| {
                DomainError::validation(
                    "scenario",
                    format!("'{}' is not a simulated path of this decision", scenario),
                )
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Attaches the analysis and moves DRAFT to ANALYZED.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the decision is a draft
    pub fn complete_analysis(&mut self, analysis: DecisionAnalysis) -> Result<(), DomainError> {
        let next = self.status.transition_to(DecisionStatus::Analyzed)?;

        self.tags = analysis.related_tags().to_vec();
        self.analysis = Some(analysis);
        if self.date_created.is_none() {
            self.date_created = Some(Timestamp::now());
        }
        self.status = next;
        Ok(())
    }

    /// Records the real outcome and moves ANALYZED to COMPLETED.
    ///
    /// Overwrites the analysis clarity score with the hindsight value and
    /// returns the score it replaced.
    ///
    /// # Errors
    ///
    /// - `DecisionNotAnalyzed` for a draft
    /// - `InvalidStateTransition` if already completed
    /// - `EmptyField` if the outcome text is blank
    pub fn record_outcome(
        &mut self,
        outcome_text: &str,
        outcome_analysis: OutcomeAnalysis,
    ) -> Result<ClarityScore, DomainError> {
        self.ensure_outcome_recordable()?;
        let outcome_text = outcome_text.trim();
        if outcome_text.is_empty() {
            return Err(ValidationError::empty_field("outcome").into());
        }
        let analysis = self.analysis.as_mut().ok_or_else(|| {
            DomainError::new(ErrorCode::DecisionNotAnalyzed, "Decision has no analysis yet")
        })?;

        let previous = analysis.revise_clarity_score(outcome_analysis.updated_clarity_score);
        self.outcome = Some(outcome_text.to_string());
        self.outcome_date = Some(Timestamp::now());
        self.outcome_analysis = Some(outcome_analysis);
        self.status = DecisionStatus::Completed;
        Ok(previous)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::decision::analysis::fixtures::sample_analysis;

    pub fn owner() -> UserId {
        UserId::new("user-1").unwrap()
    }

    pub fn job_offer_draft() -> DecisionDraft {
        DecisionDraft::new("Take the new job?")
            .with_description("Offer from a startup")
            .with_context("Current role is stable")
            .with_options(["Accept", "Decline"])
            .with_emotions([Emotion::Anxious])
    }

    pub fn draft_decision() -> Decision {
        Decision::submit(owner(), job_offer_draft()).unwrap()
    }

    pub fn analyzed_decision(clarity: i64) -> Decision {
        let mut decision = draft_decision();
        decision.complete_analysis(sample_analysis(clarity)).unwrap();
        decision
    }
}
