//! Persisted shape of a decision.
//!
//! Kept separate from the aggregate so stored documents can carry legacy
//! fields that the domain no longer models.

use serde::{Deserialize, Serialize};

use crate::domain::decision::{normalize_emotions, Decision, DecisionAnalysis, Emotion, OutcomeAnalysis};
use crate::domain::foundation::{DecisionId, DecisionStatus, Timestamp, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub id: DecisionId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default, alias = "optionsConsidered")]
    pub options: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
    /// Single emotion written by older versions.
    #[serde(default, skip_serializing)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub status: DecisionStatus,
    #[serde(default)]
    pub analysis: Option<DecisionAnalysis>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub outcome_date: Option<Timestamp>,
    #[serde(default)]
    pub outcome_analysis: Option<OutcomeAnalysis>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date_created: Option<Timestamp>,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
}

impl DecisionRecord {
    pub fn from_decision(decision: &Decision) -> Self {
        Self {
            id: *decision.id(),
            owner_id: decision.owner_id().clone(),
            title: decision.title().to_string(),
            description: decision.description().to_string(),
            context: decision.context().to_string(),
            options: decision.options().to_vec(),
            emotions: decision.emotions().to_vec(),
            emotion: None,
            status: decision.status(),
            analysis: decision.analysis().cloned(),
            outcome: decision.outcome().map(str::to_string),
            outcome_date: decision.outcome_date().copied(),
            outcome_analysis: decision.outcome_analysis().cloned(),
            tags: decision.tags().to_vec(),
            date_created: decision.date_created().copied(),
            submitted_at: Some(*decision.submitted_at()),
        }
    }

    /// True when the record predates the emotion list.
    pub fn needs_upgrade(&self) -> bool {
        self.emotions.is_empty() || self.emotion.is_some()
    }

    /// Converts to the aggregate, upgrading legacy emotion data.
    pub fn into_decision(self) -> Decision {
        let emotions = if self.emotions.is_empty() {
            normalize_emotions(self.emotion.as_deref().and_then(|e| e.parse().ok()))
        } else {
            normalize_emotions(self.emotions)
        };
        let submitted_at = self
            .submitted_at
            .or(self.date_created)
            .unwrap_or_else(Timestamp::now);

        Decision::reconstitute(
            self.id,
            self.owner_id,
            self.title,
            self.description,
            self.context,
            self.options,
            emotions,
            self.status,
            self.analysis,
            self.outcome,
            self.outcome_date,
            self.outcome_analysis,
            self.tags,
            self.date_created,
            submitted_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::fixtures::analyzed_decision;

    #[test]
    fn round_trips_through_yaml() {
        let decision = analyzed_decision(64);
        let yaml = serde_yaml::to_string(&DecisionRecord::from_decision(&decision)).unwrap();
        let back: DecisionRecord = serde_yaml::from_str(&yaml).unwrap();
        assert!(!back.needs_upgrade());
        assert_eq!(back.into_decision(), decision);
    }

    #[test]
    fn legacy_single_emotion_is_upgraded() {
        let yaml = r#"
id: 0b6c1a52-2f62-4f7e-9d36-3f1f5e7c9a10
ownerId: user-1
title: Old record
optionsConsidered: [Stay]
emotion: Anxious
status: DRAFT
"#;
        let record: DecisionRecord = serde_yaml::from_str(yaml).unwrap();
        assert!(record.needs_upgrade());

        let decision = record.into_decision();
        assert_eq!(decision.emotions(), [Emotion::Anxious]);
        assert_eq!(decision.options(), ["Stay"]);
    }

    #[test]
    fn missing_emotions_become_neutral() {
        let yaml = r#"
id: 0b6c1a52-2f62-4f7e-9d36-3f1f5e7c9a11
ownerId: user-1
title: Bare record
emotion: Elated
"#;
        let record: DecisionRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.into_decision().emotions(), [Emotion::Neutral]);
    }

    #[test]
    fn legacy_field_is_not_written_back() {
        let mut record = DecisionRecord::from_decision(&analyzed_decision(10));
        record.emotion = Some("Anxious".into());
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(!yaml.contains("emotion:"));
    }
}
