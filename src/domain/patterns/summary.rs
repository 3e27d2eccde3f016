//! Cross-decision behavioral summary.

use serde::{Deserialize, Serialize};

use crate::domain::decision::{join_emotions, Decision};

/// Derived, non-authoritative insight over one owner's decisions.
///
/// Recomputed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSummary {
    pub insight: String,
    pub dominant_bias: String,
    pub recommendation: String,
}

impl PatternSummary {
    pub fn new(
        insight: impl Into<String>,
        dominant_bias: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            insight: insight.into(),
            dominant_bias: dominant_bias.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Fixed result for an empty collection.
    pub fn insufficient_data() -> Self {
        Self::new(
            "Not enough data to generate patterns.",
            "None",
            "Start logging decisions to see patterns.",
        )
    }

    /// Safe default when the provider cannot produce a summary.
    pub fn unavailable() -> Self {
        Self::new(
            "Could not analyze patterns at this time.",
            "Unknown",
            "Continue logging to build a dataset.",
        )
    }
}

/// One line of decision history as fed to pattern detection.
pub fn history_line(decision: &Decision) -> String {
    format!(
        "Title: {}, Emotions: {}, Status: {}, Bias Found: {}",
        decision.title(),
        join_emotions(decision.emotions()),
        decision.status(),
        decision.dominant_bias().unwrap_or("None"),
    )
}

/// History lines for a whole collection, in collection order.
pub fn history_lines(decisions: &[Decision]) -> Vec<String> {
    decisions.iter().map(history_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::fixtures::{analyzed_decision, draft_decision};

    #[test]
    fn draft_line_reports_no_bias() {
        assert_eq!(
            history_line(&draft_decision()),
            "Title: Take the new job?, Emotions: Anxious, Status: DRAFT, Bias Found: None"
        );
    }

    #[test]
    fn analyzed_line_reports_top_bias() {
        let line = history_line(&analyzed_decision(60));
        assert!(line.ends_with("Status: ANALYZED, Bias Found: Status Quo Bias"));
    }

    #[test]
    fn defaults_are_distinct() {
        assert_ne!(PatternSummary::insufficient_data(), PatternSummary::unavailable());
        assert_eq!(PatternSummary::insufficient_data().dominant_bias, "None");
        assert_eq!(PatternSummary::unavailable().dominant_bias, "Unknown");
    }
}
