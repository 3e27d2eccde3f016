//! Gemini Provider - Implementation of ReasoningProvider for Google's Gemini API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_base_url("https://generativelanguage.googleapis.com/v1beta");
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! # Structured output
//!
//! `generate` sends the task as one user message and asks for
//! `application/json` with the request's response schema, so the reply
//! text is the JSON document the contract validates.
//!
//! # Conversations
//!
//! The API is stateless; a chat handle keeps the `user`/`model` history
//! itself and resends it with the system instruction on every turn.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::contract::AnalysisTask;
use crate::domain::decision::join_emotions;
use crate::domain::simulation::SimulationFraming;
use crate::ports::{
    ChatHandle, ProviderError, ProviderInfo, ReasoningProvider, StructuredRequest,
    StructuredResponse, TokenUsage,
};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
        }
    }

    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            ..Self::new(String::new())
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// HTTP plumbing shared by the provider and its chat handles.
struct GeminiTransport {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTransport {
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<Response, ProviderError> {
        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ProviderError::network(format!("Connection failed: {}", e))
                } else {
                    ProviderError::network(e.to_string())
                }
            })
    }

    async fn parse_response(
        &self,
        response: Response,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), &error_body));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedEnvelope(format!("Failed to parse response: {}", e)))
    }

    /// Sends with exponential backoff on retryable failures: 1s, 2s, 4s, ...
    async fn call(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse, ProviderError> {
        let mut retry_count = 0;

        loop {
            let result = match self.send_request(body).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(parsed) => return Ok(parsed),
                Err(err) if !err.is_retryable() || retry_count >= self.config.max_retries => {
                    return Err(err)
                }
                Err(err) => {
                    let delay = match &err {
                        ProviderError::RateLimited { retry_after_secs } => {
                            Duration::from_secs(u64::from(*retry_after_secs).max(1 << retry_count))
                        }
                        _ => Duration::from_secs(1 << retry_count),
                    };
                    warn!(
                        error = %err,
                        attempt = retry_count + 1,
                        delay_secs = delay.as_secs(),
                        "Gemini request failed, retrying"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    transport: Arc<GeminiTransport>,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            transport: Arc::new(GeminiTransport { config, client }),
        })
    }
}

#[async_trait]
impl ReasoningProvider for GeminiProvider {
    async fn generate(
        &self,
        request: StructuredRequest,
    ) -> Result<StructuredResponse, ProviderError> {
        debug!(
            task = request.task.kind(),
            trace_id = %request.metadata.trace_id,
            model = %self.transport.config.model,
            "Sending structured request to Gemini"
        );

        let body = GenerateContentRequest {
            contents: vec![Content::user(render_task_prompt(&request.task))],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema,
            }),
        };

        let response = self.transport.call(&body).await?;
        let usage = response.token_usage();
        let model = response
            .model_version
            .clone()
            .unwrap_or_else(|| self.transport.config.model.clone());

        Ok(StructuredResponse {
            content: response.text(),
            model,
            usage,
        })
    }

    async fn open_chat(
        &self,
        framing: SimulationFraming,
    ) -> Result<Box<dyn ChatHandle>, ProviderError> {
        Ok(Box::new(GeminiChat {
            transport: Arc::clone(&self.transport),
            system_instruction: Content::system(render_system_instruction(&framing)),
            history: Vec::new(),
        }))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", self.transport.config.model.clone())
    }
}

/// Conversation handle holding its own history.
struct GeminiChat {
    transport: Arc<GeminiTransport>,
    system_instruction: Content,
    history: Vec<Content>,
}

#[async_trait]
impl ChatHandle for GeminiChat {
    async fn send(&mut self, text: &str) -> Result<String, ProviderError> {
        let user = Content::user(text);
        let mut contents = self.history.clone();
        contents.push(user.clone());

        let body = GenerateContentRequest {
            contents,
            system_instruction: Some(self.system_instruction.clone()),
            generation_config: None,
        };
        let reply = self.transport.call(&body).await?.text();

        self.history.push(user);
        self.history.push(Content::model(reply.clone()));
        Ok(reply)
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// Maps a non-success HTTP status to a provider error.
fn map_status(status: u16, error_body: &str) -> ProviderError {
    match status {
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::rate_limited(parse_retry_after(error_body)),
        400 => ProviderError::InvalidRequest(error_body.to_string()),
        500..=599 => {
            ProviderError::unavailable(format!("Server error {}: {}", status, error_body))
        }
        _ => ProviderError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Reads `retryDelay` ("30s") from a Gemini error body, defaulting to 30.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<Value>(error_body)
        .ok()
        .and_then(|parsed| {
            parsed["error"]["details"]
                .as_array()?
                .iter()
                .find_map(|d| d.get("retryDelay").and_then(Value::as_str).map(str::to_string))
        })
        .and_then(|delay| delay.trim_end_matches('s').parse::<f64>().ok())
        .map(|secs| secs.ceil() as u32)
        .unwrap_or(30)
}

/// Renders a structured task as the user message.
fn render_task_prompt(task: &AnalysisTask) -> String {
    match task {
        AnalysisTask::DecisionAnalysis(brief) => format!(
            "You are a cognitive scientist and decision coach helping someone examine a decision.\n\n\
             Decision Title: {}\n\
             Description: {}\n\
             Context/Background: {}\n\
             Current Emotional State: {}\n\
             Options Considered: {}\n\n\
             Identify the cognitive biases at play, ordered from most to least relevant, \
             the blind spots they may be missing, and alternative perspectives. \
             Rate how well-reasoned the decision is as a clarity score from 0 to 100. \
             Simulate at least two paths with their likely outcome and risk level. \
             Give three to five short tags that categorise the decision.\n\n\
             Reply with JSON matching the schema.",
            brief.title,
            brief.description,
            brief.context,
            join_emotions(&brief.emotions),
            brief.options.join(", "),
        ),
        AnalysisTask::OutcomeAnalysis(brief) => format!(
            "The person has acted on a decision you analysed earlier. Relate their original \
             reasoning to what actually happened.\n\n\
             ORIGINAL DECISION\n\
             Title: {}\n\
             Description: {}\n\
             Predicted Biases: {}\n\
             Original Clarity Score: {}\n\n\
             ACTUAL OUTCOME\n\"{}\"\n\n\
             Reflect on cause and effect, say whether the predicted biases showed up, \
             name the single most useful lesson, and re-score the original decision \
             quality in hindsight from 0 to 100.\n\n\
             Reply with JSON matching the schema.",
            brief.title,
            brief.description,
            brief.predicted_biases.join(", "),
            brief.original_clarity_score,
            brief.actual_outcome,
        ),
        AnalysisTask::PatternDetection(brief) => format!(
            "Look for behavioural patterns in this decision history.\n\
             History:\n{}\n\n\
             Reply with JSON holding an insight about their decision-making style, \
             the cognitive trap they fall into most often as dominantBias, \
             and one habit to adopt as recommendation.",
            brief.history.join("\n"),
        ),
    }
}

/// Renders the simulation framing as a system instruction.
fn render_system_instruction(framing: &SimulationFraming) -> String {
    let focus = match &framing.scenario {
        Some(scenario) => format!(
            "FOCUS SCENARIO: simulate the specific path \"{}\".",
            scenario
        ),
        None => "Explore the possible outcomes generically.".to_string(),
    };
    format!(
        "You are CogniClear, a decision simulation engine.\n\n\
         DECISION CONTEXT\n\
         Title: \"{}\"\n\
         Description: \"{}\"\n\
         Context: \"{}\"\n\
         Current Emotion: \"{}\"\n\
         Options Considered: \"{}\"\n\n\
         {}\n\n\
         Play the future that follows from this decision. Speak in the second person, \
         roleplay any counterpart realistically, and do not soften real risks. \
         Keep replies under about 120 words and end each one with a development \
         or question that asks the person to choose or reflect.",
        framing.title,
        framing.description,
        framing.context,
        join_emotions(&framing.emotions),
        framing.options.join(", "),
        focus,
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Gemini API types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: impl Into<String>) -> Self {
        Self::with_role(Some("user"), text)
    }

    fn model(text: impl Into<String>) -> Self {
        Self::with_role(Some("model"), text)
    }

    fn system(text: impl Into<String>) -> Self {
        Self::with_role(None, text)
    }

    fn with_role(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate; empty if there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn token_usage(&self) -> TokenUsage {
        self.usage_metadata
            .as_ref()
            .map(|u| {
                TokenUsage::new(
                    u.prompt_token_count.unwrap_or(0),
                    u.candidates_token_count.unwrap_or(0),
                )
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contract::{DecisionBrief, PatternBrief, DECISION_ANALYSIS_SCHEMA};
    use crate::domain::decision::fixtures::{analyzed_decision, draft_decision};
    use crate::domain::decision::Emotion;
    use serde_json::json;

    #[test]
    fn config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = GeminiConfig::new("key").with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn config_debug_hides_key() {
        let config = GeminiConfig::new("super-secret-key");
        assert!(!format!("{:?}", config).contains("super-secret-key"));
    }

    #[test]
    fn generate_url_names_model() {
        let provider = GeminiProvider::new(
            GeminiConfig::new("key")
                .with_base_url("http://localhost:9000/v1beta")
                .with_model("gemini-test"),
        )
        .unwrap();
        assert_eq!(
            provider.transport.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(provider.provider_info(), ProviderInfo::new("gemini", "gemini-test"));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(map_status(401, ""), ProviderError::AuthenticationFailed);
        assert_eq!(map_status(403, ""), ProviderError::AuthenticationFailed);
        assert!(matches!(map_status(429, ""), ProviderError::RateLimited { .. }));
        assert!(matches!(map_status(400, "bad"), ProviderError::InvalidRequest(_)));
        assert!(matches!(map_status(503, ""), ProviderError::Unavailable { .. }));
        assert!(matches!(map_status(418, ""), ProviderError::Network(_)));
    }

    #[test]
    fn retry_after_is_read_from_details() {
        let body = json!({
            "error": {
                "code": 429,
                "details": [
                    { "@type": "type.googleapis.com/google.rpc.QuotaFailure" },
                    { "@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "12.5s" }
                ]
            }
        })
        .to_string();
        assert_eq!(parse_retry_after(&body), 13);
        assert_eq!(parse_retry_after("not json"), 30);
    }

    #[test]
    fn structured_body_uses_camel_case_keys() {
        let body = GenerateContentRequest {
            contents: vec![Content::user("hi")],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: DECISION_ANALYSIS_SCHEMA.clone(),
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert!(value["generationConfig"]["responseSchema"]["properties"]
            .get("clarityScore")
            .is_some());
        assert!(value.get("systemInstruction").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
    }

    #[test]
    fn response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 8 },
            "modelVersion": "gemini-2.5-flash"
        }))
        .unwrap();
        assert_eq!(response.text(), "{\"a\":1}");
        assert_eq!(response.token_usage(), TokenUsage::new(12, 8));
    }

    #[test]
    fn missing_candidate_yields_empty_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert_eq!(response.text(), "");
        assert_eq!(response.token_usage(), TokenUsage::zero());
    }

    #[test]
    fn decision_prompt_carries_every_field() {
        let brief = DecisionBrief::new(
            "Relocate?",
            "New city",
            "Family nearby",
            vec![Emotion::Excited, Emotion::Anxious],
            vec!["Move".into(), "Stay".into()],
        )
        .unwrap();
        let prompt = render_task_prompt(&AnalysisTask::DecisionAnalysis(brief));
        assert!(prompt.contains("Decision Title: Relocate?"));
        assert!(prompt.contains("Current Emotional State: Excited, Anxious"));
        assert!(prompt.contains("Options Considered: Move, Stay"));
    }

    #[test]
    fn pattern_prompt_lists_history() {
        let prompt = render_task_prompt(&AnalysisTask::PatternDetection(PatternBrief {
            history: vec!["Title: A".into(), "Title: B".into()],
        }));
        assert!(prompt.contains("Title: A\nTitle: B"));
    }

    #[test]
    fn system_instruction_mentions_scenario_when_focused() {
        let generic = SimulationFraming::for_decision(&draft_decision(), None).unwrap();
        assert!(render_system_instruction(&generic).contains("generically"));

        let focused =
            SimulationFraming::for_decision(&analyzed_decision(50), Some("Accept the offer"))
                .unwrap();
        assert!(render_system_instruction(&focused).contains("\"Accept the offer\""));
    }
}
