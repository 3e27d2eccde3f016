//! Analysis contract - typed requests and validated responses.
//!
//! The contract is provider-agnostic: a request is one of three structured
//! tasks, and a response is accepted only when it passes field-by-field
//! validation. A rejected response never touches a decision.

mod errors;
mod request;
mod schema;
mod validate;

pub use errors::ContractError;
pub use request::{AnalysisTask, DecisionBrief, OutcomeBrief, PatternBrief};
pub use schema::{DECISION_ANALYSIS_SCHEMA, OUTCOME_ANALYSIS_SCHEMA, PATTERN_SUMMARY_SCHEMA};
pub use validate::{parse_decision_analysis, parse_outcome_analysis, parse_pattern_summary};
