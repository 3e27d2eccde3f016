//! Caller-supplied fields for a new decision and their normalisation.

use serde::{Deserialize, Serialize};

use super::emotion::{normalize_emotions, Emotion};
use crate::domain::foundation::{Timestamp, ValidationError};

/// Option substituted when the caller supplies no usable options.
pub const DEFAULT_OPTION: &str = "Default Path";

/// Raw descriptive fields as entered by the person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
    /// Creation date chosen by the caller, if any.
    #[serde(default)]
    pub date_created: Option<Timestamp>,
}

impl DecisionDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_emotions(mut self, emotions: impl IntoIterator<Item = Emotion>) -> Self {
        self.emotions = emotions.into_iter().collect();
        self
    }

    pub fn with_date_created(mut self, date: Timestamp) -> Self {
        self.date_created = Some(date);
        self
    }

    /// Applies submission rules and returns the canonical field set.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank after trimming
    pub fn normalize(self) -> Result<NormalizedDraft, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }

        let mut options: Vec<String> = self
            .options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if options.is_empty() {
            options.push(DEFAULT_OPTION.to_string());
        }

        Ok(NormalizedDraft {
            title,
            description: self.description.trim().to_string(),
            context: self.context.trim().to_string(),
            options,
            emotions: normalize_emotions(self.emotions),
            date_created: self.date_created,
        })
    }
}

/// Draft fields after normalisation: title non-empty, options and emotions non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDraft {
    pub title: String,
    pub description: String,
    pub context: String,
    pub options: Vec<String>,
    pub emotions: Vec<Emotion>,
    pub date_created: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        let err = DecisionDraft::new("   ").normalize().unwrap_err();
        assert_eq!(err, ValidationError::empty_field("title"));
    }

    #[test]
    fn missing_options_get_sentinel() {
        let normalized = DecisionDraft::new("Move?")
            .with_options(["", "  "])
            .normalize()
            .unwrap();
        assert_eq!(normalized.options, vec![DEFAULT_OPTION.to_string()]);
    }

    #[test]
    fn fields_are_trimmed_and_order_kept() {
        let normalized = DecisionDraft::new("  Job offer ")
            .with_description(" big company ")
            .with_options([" Accept", "Decline "])
            .normalize()
            .unwrap();
        assert_eq!(normalized.title, "Job offer");
        assert_eq!(normalized.description, "big company");
        assert_eq!(normalized.options, vec!["Accept", "Decline"]);
    }

    #[test]
    fn missing_emotions_become_neutral() {
        let normalized = DecisionDraft::new("Move?").normalize().unwrap();
        assert_eq!(normalized.emotions, vec![Emotion::Neutral]);
    }

    #[test]
    fn deserializes_with_defaults() {
        let draft: DecisionDraft = serde_json::from_str(r#"{"title":"Rent or buy"}"#).unwrap();
        assert_eq!(draft.title, "Rent or buy");
        assert!(draft.options.is_empty());
        assert!(draft.date_created.is_none());
    }
}
