//! Decision module - the decision record and its lifecycle.
//!
//! The `Decision` aggregate owns descriptive fields, the provider analysis,
//! and the real-world outcome. Transitions are pure; callers obtain analysis
//! results first and then hand them to the aggregate.

mod aggregate;
mod analysis;
mod draft;
mod emotion;

pub use aggregate::Decision;
pub use analysis::{
    BiasFinding, DecisionAnalysis, OutcomeAnalysis, RiskLevel, SimulatedOutcome, MAX_RELATED_TAGS,
};
pub use draft::{DecisionDraft, NormalizedDraft, DEFAULT_OPTION};
pub use emotion::{join_emotions, normalize_emotions, Emotion};

#[cfg(test)]
pub(crate) mod fixtures {
    pub use super::aggregate::fixtures::*;
    pub use super::analysis::fixtures::*;
}
