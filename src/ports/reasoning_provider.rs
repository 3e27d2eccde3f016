//! Reasoning Provider Port - Interface for the external analysis service.
//!
//! This port abstracts every interaction with the reasoning provider,
//! enabling the engine to request structured analyses and hold multi-turn
//! simulation conversations without coupling to a specific vendor.
//!
//! # Design
//!
//! - Structured generation: a typed task plus a response schema in, raw
//!   JSON text out. Validation of that text is the contract's job.
//! - Conversations: `open_chat` returns a handle that owns its history.
//!   `send` takes `&mut self`, so one handle can never have two turns in
//!   flight, and history is only extended once a reply has arrived.
//!
//! # Example
//!
//! ```ignore
//! let response = provider
//!     .generate(StructuredRequest::new(task, metadata))
//!     .await?;
//! let analysis = parse_decision_analysis(&response.content)?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::contract::AnalysisTask;
use crate::domain::foundation::{DecisionId, UserId};
use crate::domain::simulation::SimulationFraming;

/// Port for reasoning provider interactions.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Run one structured task and return the provider's raw reply.
    async fn generate(&self, request: StructuredRequest)
        -> Result<StructuredResponse, ProviderError>;

    /// Open a conversation primed with the simulation framing.
    ///
    /// No turn is sent; the caller sends the opening message itself.
    async fn open_chat(
        &self,
        framing: SimulationFraming,
    ) -> Result<Box<dyn ChatHandle>, ProviderError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// A live provider-side conversation.
#[async_trait]
pub trait ChatHandle: Send {
    /// Send one user message and wait for the reply.
    ///
    /// The exchange is committed to the handle's history only on success.
    /// Dropping the returned future leaves the history as it was.
    async fn send(&mut self, text: &str) -> Result<String, ProviderError>;

    /// Number of messages committed so far (user and model).
    fn history_len(&self) -> usize;
}

/// Request for a structured analysis.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Typed task input.
    pub task: AnalysisTask,
    /// JSON schema the reply must follow.
    pub response_schema: Value,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl StructuredRequest {
    /// Creates a request using the task's own response schema.
    pub fn new(task: AnalysisTask, metadata: RequestMetadata) -> Self {
        let response_schema = task.response_schema().clone();
        Self {
            task,
            response_schema,
            metadata,
        }
    }

    /// Overrides the response schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = schema;
        self
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Owner the request is made for.
    pub user_id: UserId,
    /// Decision the request concerns, if any.
    pub decision_id: Option<DecisionId>,
    /// Trace ID for correlating logs.
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(user_id: UserId, trace_id: impl Into<String>) -> Self {
        Self {
            user_id,
            decision_id: None,
            trace_id: trace_id.into(),
        }
    }

    pub fn for_decision(mut self, decision_id: DecisionId) -> Self {
        self.decision_id = Some(decision_id);
        self
    }
}

/// Raw reply to a structured request.
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// Reply text, expected to be JSON.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
    /// Token usage.
    pub usage: TokenUsage,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "mock").
    pub name: String,
    /// Model identifier (e.g., "gemini-2.5-flash").
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Reasoning provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport envelope could not be decoded.
    #[error("malformed provider envelope: {0}")]
    MalformedEnvelope(String),
}

impl ProviderError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::Unavailable { .. }
                | ProviderError::Network(_)
                | ProviderError::Timeout { .. }
        )
    }
}
