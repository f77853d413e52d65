//! Model Backend Traits
//!
//! Trait definitions for generative-model backends. The fetcher only speaks
//! to this trait, so tests and alternative providers can stand in for the
//! hosted model without touching lookup logic.

use async_trait::async_trait;

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// A single structured-output request
#[derive(Clone, Debug)]
pub struct LlmRequest {
    /// The prompt to send
    pub prompt: String,
    /// Model to use (backend-specific identifier)
    pub model: String,
    /// Sampling temperature (0.0-2.0, lower = more deterministic)
    pub temperature: f32,
    /// Requested MIME type of the response (e.g. `application/json`)
    pub response_mime_type: Option<String>,
    /// Schema the response must follow
    pub response_schema: Option<serde_json::Value>,
}

impl Default for LlmRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            model: String::new(),
            temperature: 1.0,
            response_mime_type: None,
            response_schema: None,
        }
    }
}

impl LlmRequest {
    /// Create a new request with prompt and model
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Ask for JSON output matching `schema`
    #[must_use]
    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self.response_schema = Some(schema);
        self
    }
}

/// Response from a model request
#[derive(Clone, Debug)]
pub struct LlmResponse {
    /// The response text, `None` when the model produced nothing
    pub content: Option<String>,
    /// Model that generated the response
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Response generation time in milliseconds
    pub duration_ms: Option<u64>,
}

/// Model backend trait
///
/// Implement this trait to add support for different model providers.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Check if the backend is healthy and reachable
    async fn health_check(&self) -> bool;

    /// Send a request and wait for the complete response
    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse>;
}

/// Backend connection configuration
#[derive(Clone, Debug)]
pub enum BackendConfig {
    /// Hosted Gemini API
    Gemini {
        /// API key (may be empty, in which case every request fails)
        api_key: String,
        /// Base URL of the REST API
        base_url: String,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Gemini {
            api_key: String::new(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Create Gemini configuration with the default endpoint
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}
