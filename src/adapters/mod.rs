//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `ai` - reasoning providers (Gemini, mock)
//! - `repository` - decision storage (in-memory, YAML files)

pub mod ai;
pub mod repository;

pub use ai::{GeminiConfig, GeminiProvider, MockReasoningProvider};
pub use repository::{FileDecisionRepository, InMemoryDecisionRepository};
