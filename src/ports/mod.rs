//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ReasoningProvider` / `ChatHandle` - structured analysis and
//!   multi-turn simulation conversations
//! - `DecisionRepository` - owner-scoped persistence of decisions

mod decision_repository;
mod reasoning_provider;

pub use decision_repository::{decision_not_found, ensure_unchanged, DecisionRepository};
pub use reasoning_provider::{
    ChatHandle, ProviderError, ProviderInfo, ReasoningProvider, RequestMetadata,
    StructuredRequest, StructuredResponse, TokenUsage,
};
