//! Gemini Backend Implementation
//!
//! Backend for the hosted Gemini generative-language API.
//!
//! # Gemini API
//!
//! - `POST /v1beta/models/{model}:generateContent` - one-shot generation
//! - `GET /v1beta/models` - model listing (used as a health check)
//!
//! Structured output is requested through `generationConfig.responseMimeType`
//! and `generationConfig.responseSchema`.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::traits::{BackendConfig, LlmBackend, LlmRequest, LlmResponse, DEFAULT_GEMINI_BASE_URL};

/// Gemini backend client
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct GeminiBackend {
    /// API key sent in the `x-goog-api-key` header
    api_key: String,
    /// Base URL of the REST API
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create from `BackendConfig`
    pub fn from_config(config: &BackendConfig, timeout: Duration) -> anyhow::Result<Self> {
        match config {
            BackendConfig::Gemini { api_key, base_url } => {
                Self::new(api_key.clone(), base_url.clone(), timeout)
            }
        }
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Get generate endpoint URL
    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Get model listing URL
    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    /// Build the JSON body for a generate request
    fn build_body(request: &LlmRequest) -> serde_json::Value {
        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });

        if let Some(ref mime) = request.response_mime_type {
            generation_config["responseMimeType"] = serde_json::json!(mime);
        }
        if let Some(ref schema) = request.response_schema {
            generation_config["responseSchema"] = schema.clone();
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Pull the generated text out of a generate response
    ///
    /// Text parts of the first candidate are concatenated. Returns `None`
    /// when there is no candidate or no text.
    fn extract_text(data: &serde_json::Value) -> Option<String> {
        let parts = data
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .as_array()?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(serde_json::Value::as_str))
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn health_check(&self) -> bool {
        if !self.has_api_key() {
            return false;
        }
        self.http_client
            .get(self.models_url())
            .header("x-goog-api-key", &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        if !self.has_api_key() {
            anyhow::bail!("No Gemini API key configured (set GEMINI_API_KEY)");
        }

        let start = Instant::now();
        let body = Self::build_body(request);

        let response = self
            .http_client
            .post(self.generate_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let tokens_used = data
            .get("usageMetadata")
            .and_then(|u| u.get("totalTokenCount"))
            .and_then(serde_json::Value::as_u64)
            .map(|c| c as u32);

        Ok(LlmResponse {
            content: Self::extract_text(&data),
            model: request.model.clone(),
            tokens_used,
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }
}
