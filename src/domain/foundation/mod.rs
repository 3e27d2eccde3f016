//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the decision engine.

mod clarity_score;
mod decision_status;
mod errors;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;

pub use clarity_score::ClarityScore;
pub use decision_status::DecisionStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DecisionId, SimulationId, UserId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
