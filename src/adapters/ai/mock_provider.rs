//! Mock Reasoning Provider for testing.
//!
//! Provides a configurable mock implementation of the ReasoningProvider
//! port, allowing tests to run without calling a real provider.
//!
//! # Features
//!
//! - Pre-configured replies shared by structured calls and chat turns
//! - Simulated delays for cancellation and timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockReasoningProvider::new()
//!     .with_json_response(analysis_json)
//!     .with_response("You step into the new office.")
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::contract::AnalysisTask;
use crate::domain::simulation::SimulationFraming;
use crate::ports::{
    ChatHandle, ProviderError, ProviderInfo, ReasoningProvider, StructuredRequest,
    StructuredResponse, TokenUsage,
};

/// Mock reasoning provider for testing.
///
/// Clones share the same queue and call log.
#[derive(Debug, Clone)]
pub struct MockReasoningProvider {
    /// Pre-configured replies (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Failures for upcoming `open_chat` calls.
    open_chat_errors: Arc<Mutex<VecDeque<MockError>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text.
    Success { content: String, usage: TokenUsage },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for ProviderError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => {
                ProviderError::rate_limited(retry_after_secs)
            }
            MockError::Unavailable { message } => ProviderError::unavailable(message),
            MockError::AuthenticationFailed => ProviderError::AuthenticationFailed,
            MockError::Network { message } => ProviderError::network(message),
            MockError::Timeout { timeout_secs } => ProviderError::Timeout { timeout_secs },
        }
    }
}

/// One recorded interaction.
#[derive(Debug, Clone)]
pub enum MockCall {
    Generate { task: AnalysisTask },
    OpenChat { framing: SimulationFraming },
    ChatSend { text: String },
}

impl Default for MockReasoningProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockReasoningProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            open_chat_errors: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful reply to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::Success {
            content: content.into(),
            usage: TokenUsage::new(10, 20),
        })
    }

    /// Adds a JSON reply to the queue.
    pub fn with_json_response(self, value: Value) -> Self {
        self.with_response(value.to_string())
    }

    /// Adds an error reply to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Makes the next `open_chat` call fail.
    pub fn with_open_chat_error(self, error: MockError) -> Self {
        locked(&self.open_chat_errors).push_back(error);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Queues a reply on an already shared provider.
    pub fn push(self, response: MockResponse) -> Self {
        self.enqueue(response);
        self
    }

    /// Queues a reply without consuming the builder.
    pub fn enqueue(&self, response: MockResponse) {
        locked(&self.responses).push_back(response);
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        locked(&self.calls).clone()
    }

    /// Number of structured `generate` calls.
    pub fn generate_count(&self) -> usize {
        locked(&self.calls)
            .iter()
            .filter(|c| matches!(c, MockCall::Generate { .. }))
            .count()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        locked(&self.calls).clear();
    }

    /// Replies still waiting in the queue.
    pub fn pending_responses(&self) -> usize {
        locked(&self.responses).len()
    }

    fn record(&self, call: MockCall) {
        locked(&self.calls).push(call);
    }

    fn next_response(&self) -> MockResponse {
        locked(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: "Mock response".to_string(),
                usage: TokenUsage::new(5, 10),
            })
    }
}

#[async_trait]
impl ReasoningProvider for MockReasoningProvider {
    async fn generate(
        &self,
        request: StructuredRequest,
    ) -> Result<StructuredResponse, ProviderError> {
        self.record(MockCall::Generate { task: request.task });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success { content, usage } => Ok(StructuredResponse {
                content,
                model: self.info.model.clone(),
                usage,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    async fn open_chat(
        &self,
        framing: SimulationFraming,
    ) -> Result<Box<dyn ChatHandle>, ProviderError> {
        self.record(MockCall::OpenChat { framing });

        if let Some(err) = locked(&self.open_chat_errors).pop_front() {
            return Err(err.into());
        }
        Ok(Box::new(MockChatHandle {
            provider: self.clone(),
            history: Vec::new(),
        }))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

/// Chat handle that draws replies from the owning mock's queue.
#[derive(Debug)]
pub struct MockChatHandle {
    provider: MockReasoningProvider,
    history: Vec<(String, String)>,
}

#[async_trait]
impl ChatHandle for MockChatHandle {
    async fn send(&mut self, text: &str) -> Result<String, ProviderError> {
        self.provider.record(MockCall::ChatSend {
            text: text.to_string(),
        });

        if !self.provider.delay.is_zero() {
            sleep(self.provider.delay).await;
        }

        match self.provider.next_response() {
            MockResponse::Success { content, .. } => {
                self.history.push((text.to_string(), content.clone()));
                Ok(content)
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn history_len(&self) -> usize {
        self.history.len() * 2
    }
}
