//! Emotional-state tags attached to a decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Emotional state the person reports while facing a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Anxious,
    Excited,
    Confused,
    Confident,
    Pressure,
    Neutral,
}

impl Emotion {
    /// All tags in display order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Anxious,
        Emotion::Excited,
        Emotion::Confused,
        Emotion::Confident,
        Emotion::Pressure,
        Emotion::Neutral,
    ];

    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anxious => "Anxious",
            Emotion::Excited => "Excited",
            Emotion::Confused => "Confused",
            Emotion::Confident => "Confident",
            Emotion::Pressure => "Pressure",
            Emotion::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                ValidationError::invalid_format("emotions", format!("unknown emotion '{}'", s))
            })
    }
}

/// Deduplicates the selection preserving first-seen order.
///
/// An empty selection becomes `[Neutral]` so a submitted decision always
/// carries at least one tag.
pub fn normalize_emotions(selected: impl IntoIterator<Item = Emotion>) -> Vec<Emotion> {
    let mut emotions: Vec<Emotion> = Vec::new();
    for emotion in selected {
        if !emotions.contains(&emotion) {
            emotions.push(emotion);
        }
    }
    if emotions.is_empty() {
        emotions.push(Emotion::Neutral);
    }
    emotions
}

/// Joins tags the way history lines and prompts show them.
pub fn join_emotions(emotions: &[Emotion]) -> String {
    emotions
        .iter()
        .map(Emotion::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
