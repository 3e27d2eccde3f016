//! Local decision statistics computed without any provider call.

use serde::Serialize;

use crate::domain::decision::{Decision, Emotion};
use crate::domain::foundation::{DecisionStatus, Percentage, Timestamp};

/// Number of bias names reported in the distribution.
pub const MAX_BIAS_ENTRIES: usize = 5;

/// Minimum mean difference, in points, counted as a trend.
pub const TREND_THRESHOLD: f64 = 5.0;

/// Direction of clarity over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarityTrend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasShare {
    pub name: String,
    pub occurrences: usize,
    pub share: Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionCount {
    pub emotion: Emotion,
    pub count: usize,
}

/// Dashboard figures for one owner's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStats {
    pub total: usize,
    pub drafts: usize,
    pub analyzed: usize,
    pub completed: usize,
    pub average_clarity: u8,
    pub bias_distribution: Vec<BiasShare>,
    pub emotion_counts: Vec<EmotionCount>,
    pub clarity_trend: ClarityTrend,
}

impl DecisionStats {
    pub fn compute(decisions: &[Decision]) -> Self {
        let count = |status: DecisionStatus| {
            decisions.iter().filter(|d| d.status() == status).count()
        };

        Self {
            total: decisions.len(),
            drafts: count(DecisionStatus::Draft),
            analyzed: count(DecisionStatus::Analyzed),
            completed: count(DecisionStatus::Completed),
            average_clarity: average_clarity(decisions),
            bias_distribution: bias_distribution(decisions),
            emotion_counts: emotion_counts(decisions),
            clarity_trend: clarity_trend(decisions),
        }
    }
}

/// Rounded mean clarity; unanalysed decisions count as zero.
pub fn average_clarity(decisions: &[Decision]) -> u8 {
    if decisions.is_empty() {
        return 0;
    }
    let total: u32 = decisions
        .iter()
        .map(|d| d.clarity_score().map_or(0, |s| u32::from(s.value())))
        .sum();
    (f64::from(total) / decisions.len() as f64).round() as u8
}

/// Share of every bias occurrence per name, first five in first-seen order.
pub fn bias_distribution(decisions: &[Decision]) -> Vec<BiasShare> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total = 0usize;

    for bias in decisions
        .iter()
        .filter_map(Decision::analysis)
        .flat_map(|a| a.biases())
    {
        total += 1;
        match counts.iter_mut().find(|(name, _)| *name == bias.name) {
            Some((_, n)) => *n += 1,
            None => counts.push((bias.name.clone(), 1)),
        }
    }

    counts
        .into_iter()
        .take(MAX_BIAS_ENTRIES)
        .map(|(name, occurrences)| BiasShare {
            name,
            occurrences,
            share: Percentage::share_of(occurrences, total),
        })
        .collect()
}

/// Occurrences per emotion tag, excluding `Neutral`, in vocabulary order.
pub fn emotion_counts(decisions: &[Decision]) -> Vec<EmotionCount> {
    Emotion::ALL
        .into_iter()
        .filter(|e| *e != Emotion::Neutral)
        .map(|emotion| EmotionCount {
            emotion,
            count: decisions
                .iter()
                .filter(|d| d.emotions().contains(&emotion))
                .count(),
        })
        .collect()
}

/// Compares the newer half of analysed decisions against the older half.
pub fn clarity_trend(decisions: &[Decision]) -> ClarityTrend {
    let mut scored: Vec<_> = decisions
        .iter()
        .filter_map(|d| d.clarity_score().map(|s| (d.sort_key(), f64::from(s.value()))))
        .collect();
    if scored.len() < 2 {
        return ClarityTrend::InsufficientData;
    }
    scored.sort_by_key(|(at, _)| *at);

    let mid = scored.len() / 2;
    let mean = |slice: &[(Timestamp, f64)]| {
        slice.iter().map(|(_, v)| v).sum::<f64>() / slice.len() as f64
    };
    let older = mean(&scored[..mid]);
    let newer = mean(&scored[scored.len() - mid..]);

    let delta = newer - older;
    if delta >= TREND_THRESHOLD {
        ClarityTrend::Improving
    } else if delta <= -TREND_THRESHOLD {
        ClarityTrend::Declining
    } else {
        ClarityTrend::Stable
    }
}
