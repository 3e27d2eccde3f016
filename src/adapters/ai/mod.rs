//! Reasoning Provider Adapters.
//!
//! Implementations of the ReasoningProvider port.
//!
//! ## Available Adapters
//!
//! - `MockReasoningProvider` - Configurable mock for testing
//! - `GeminiProvider` - Google Gemini models over the REST API

mod gemini_provider;
mod mock_provider;

pub use gemini_provider::{GeminiConfig, GeminiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock_provider::{MockCall, MockChatHandle, MockError, MockReasoningProvider, MockResponse};
