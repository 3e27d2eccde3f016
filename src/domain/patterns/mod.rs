//! Pattern aggregation over one owner's decision collection.
//!
//! Everything here is a pure function of the collection; nothing is cached.

mod stats;
mod summary;

pub use stats::{
    average_clarity, bias_distribution, clarity_trend, emotion_counts, BiasShare, ClarityTrend,
    DecisionStats, EmotionCount, MAX_BIAS_ENTRIES, TREND_THRESHOLD,
};
pub use summary::{history_line, history_lines, PatternSummary};
