//! Ordered conversation record of a simulation session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: Timestamp,
    /// True for messages the engine wrote in place of a provider reply.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

/// Append-only transcript.
///
/// Turns are appended as complete `[user, assistant]` pairs so a turn that
/// never resolved leaves no trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the assistant's opening message.
    pub fn open(&mut self, text: impl Into<String>, synthetic: bool) {
        self.entries.push(TranscriptEntry {
            speaker: Speaker::Assistant,
            text: text.into(),
            at: Timestamp::now(),
            synthetic,
        });
    }

    /// Records one completed turn.
    pub fn push_turn(
        &mut self,
        user_text: impl Into<String>,
        reply: impl Into<String>,
        synthetic_reply: bool,
    ) {
        let at = Timestamp::now();
        self.entries.push(TranscriptEntry {
            speaker: Speaker::User,
            text: user_text.into(),
            at,
            synthetic: false,
        });
        self.entries.push(TranscriptEntry {
            speaker: Speaker::Assistant,
            text: reply.into(),
            at,
            synthetic: synthetic_reply,
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn speakers(&self) -> Vec<Speaker> {
        self.entries.iter().map(|e| e.speaker).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_follow_the_opening_in_order() {
        let mut transcript = Transcript::new();
        transcript.open("You arrive at the office.", false);
        transcript.push_turn("I sit down", "Your phone rings.", false);

        assert_eq!(
            transcript.speakers(),
            vec![Speaker::Assistant, Speaker::User, Speaker::Assistant]
        );
        assert_eq!(transcript.last().unwrap().text, "Your phone rings.");
    }

    #[test]
    fn synthetic_flag_is_kept_on_reply_only() {
        let mut transcript = Transcript::new();
        transcript.push_turn("hello", "Connection interrupted.", true);
        assert!(!transcript.entries()[0].synthetic);
        assert!(transcript.entries()[1].synthetic);
    }

    #[test]
    fn speaker_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Speaker::Assistant).unwrap(), "\"assistant\"");
    }
}
