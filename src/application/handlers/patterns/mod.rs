//! Pattern and statistics query handlers.

mod generate_patterns;
mod get_decision_stats;

pub use generate_patterns::{GeneratePatternsHandler, GeneratePatternsQuery};
pub use get_decision_stats::{GetDecisionStatsHandler, GetDecisionStatsQuery};
