//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `decision` - Decision aggregate and its lifecycle
//! - `contract` - Typed provider requests and validated responses
//! - `patterns` - Cross-decision summaries and statistics
//! - `simulation` - Transcript, framing and status of what-if conversations

pub mod contract;
pub mod decision;
pub mod foundation;
pub mod patterns;
pub mod simulation;
