//! Character Detail Fetcher
//!
//! Turns a glyph into a [`CharacterRecord`] by asking the model backend for
//! structured learning data. [`CharacterFetcher::lookup`] always resolves:
//! every failure is logged and replaced with the sentinel record so the
//! detail panel always has something to render.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{LlmBackend, LlmRequest};
use crate::glyph::Glyph;
use crate::record::CharacterRecord;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default sampling temperature (favours accuracy over variety)
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Why a lookup fell back to the sentinel record
#[derive(Debug, Error)]
pub enum LookupError {
    /// The backend call itself failed (network, HTTP status, auth)
    #[error("model backend failed: {0}")]
    Backend(#[source] anyhow::Error),

    /// The model answered without any text
    #[error("no response from model")]
    EmptyResponse,

    /// The text did not parse into the expected shape
    #[error("malformed model response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Shape the model is asked to produce
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPayload {
    pinyin: String,
    definition: String,
    example: String,
    example_translation: String,
}

/// Fetches learning details for single characters
pub struct CharacterFetcher<B: LlmBackend> {
    /// Model backend
    backend: Arc<B>,
    /// Model identifier
    model: String,
    /// Sampling temperature
    temperature: f32,
}

impl<B: LlmBackend> CharacterFetcher<B> {
    /// Create a fetcher with the default model and temperature
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a fetcher around an already shared backend
    pub fn from_arc(backend: Arc<B>) -> Self {
        Self {
            backend,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Use a different model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The backend this fetcher talks to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Look up `glyph`, substituting the sentinel record on any failure
    pub async fn lookup(&self, glyph: Glyph) -> CharacterRecord {
        match self.try_lookup(glyph).await {
            Ok(record) => {
                tracing::debug!(glyph = %glyph, pinyin = %record.pinyin, "Lookup succeeded");
                record
            }
            Err(e) => {
                tracing::error!(glyph = %glyph, error = %e, "Lookup failed, using fallback record");
                CharacterRecord::sentinel(glyph)
            }
        }
    }

    /// Look up `glyph`, reporting why it failed
    pub async fn try_lookup(&self, glyph: Glyph) -> Result<CharacterRecord, LookupError> {
        let request = LlmRequest::new(prompt_for(glyph), &self.model)
            .with_temperature(self.temperature)
            .with_json_schema(response_schema());

        let response = self
            .backend
            .send(&request)
            .await
            .map_err(LookupError::Backend)?;

        let text = response
            .content
            .filter(|t| !t.trim().is_empty())
            .ok_or(LookupError::EmptyResponse)?;

        parse_record(glyph, &text)
    }
}

/// Prompt sent for `glyph`
#[must_use]
pub fn prompt_for(glyph: Glyph) -> String {
    format!(
        "Provide learning details for the Chinese character: {glyph}. \
         Ensure the pinyin is accurate and the example is simple."
    )
}

/// Output schema declared to the model
///
/// Uses the OpenAPI subset the Gemini API accepts: four required strings.
#[must_use]
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "pinyin": {
                "type": "STRING",
                "description": "The Pinyin pronunciation of the character with tone marks (e.g., māo)."
            },
            "definition": {
                "type": "STRING",
                "description": "A concise English definition of the character."
            },
            "example": {
                "type": "STRING",
                "description": "A simple Chinese example sentence using the character."
            },
            "exampleTranslation": {
                "type": "STRING",
                "description": "The English translation of the example sentence."
            }
        },
        "required": ["pinyin", "definition", "example", "exampleTranslation"]
    })
}

/// Parse model output into a record for `glyph`
///
/// Accepts the bare JSON object, optionally wrapped in a Markdown code fence.
pub fn parse_record(glyph: Glyph, text: &str) -> Result<CharacterRecord, LookupError> {
    let payload: ModelPayload = serde_json::from_str(strip_code_fence(text))?;
    Ok(CharacterRecord {
        char: glyph.to_string(),
        pinyin: payload.pinyin,
        definition: payload.definition,
        example: payload.example,
        example_translation: payload.example_translation,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LlmResponse;
    use pretty_assertions::assert_eq;

    const GOOD: &str = r#"{"pinyin":"māo","definition":"cat","example":"我有一只猫。","exampleTranslation":"I have a cat."}"#;

    struct FixedBackend(Option<&'static str>);

    #[async_trait::async_trait]
    impl LlmBackend for FixedBackend {
        fn name(&self) -> &str {
            "Fixed"
        }

        async fn health_check(&self) -> bool {
            true
        }

        async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
            Ok(LlmResponse {
                content: self.0.map(String::from),
                model: request.model.clone(),
                tokens_used: None,
                duration_ms: None,
            })
        }
    }

    struct FailingBackend;

    #[async_trait::async_trait]
    impl LlmBackend for FailingBackend {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn health_check(&self) -> bool {
            false
        }

        async fn send(&self, _request: &LlmRequest) -> anyhow::Result<LlmResponse> {
            anyhow::bail!("connection refused")
        }
    }

    #[test]
    fn test_prompt_embeds_glyph() {
        let prompt = prompt_for(Glyph::new('猫'));
        assert!(prompt.contains("Chinese character: 猫."));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(
            schema["required"],
            serde_json::json!(["pinyin", "definition", "example", "exampleTranslation"])
        );
        for field in ["pinyin", "definition", "example", "exampleTranslation"] {
            assert_eq!(schema["properties"][field]["type"], "STRING");
        }
    }

    #[test]
    fn test_parse_record_plain_and_fenced() {
        let glyph = Glyph::new('猫');
        let plain = parse_record(glyph, GOOD).unwrap();
        assert_eq!(plain.char, "猫");
        assert_eq!(plain.pinyin, "māo");
        assert_eq!(plain.example_translation, "I have a cat.");

        let fenced = parse_record(glyph, &format!("```json\n{GOOD}\n```")).unwrap();
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_parse_record_missing_field() {
        let err = parse_record(Glyph::new('猫'), r#"{"pinyin":"māo"}"#).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_lookup_success() {
        let fetcher = CharacterFetcher::new(FixedBackend(Some(GOOD)));
        let record = fetcher.lookup(Glyph::new('猫')).await;
        assert!(!record.is_sentinel());
        assert_eq!(record.definition, "cat");
    }

    #[tokio::test]
    async fn test_lookup_backend_failure_yields_sentinel() {
        let fetcher = CharacterFetcher::new(FailingBackend);
        let glyph = Glyph::new('水');
        assert!(matches!(
            fetcher.try_lookup(glyph).await,
            Err(LookupError::Backend(_))
        ));
        assert_eq!(fetcher.lookup(glyph).await, CharacterRecord::sentinel(glyph));
    }

    #[tokio::test]
    async fn test_lookup_empty_response_yields_sentinel() {
        let fetcher = CharacterFetcher::new(FixedBackend(None));
        let glyph = Glyph::new('火');
        assert!(matches!(
            fetcher.try_lookup(glyph).await,
            Err(LookupError::EmptyResponse)
        ));
        assert!(fetcher.lookup(glyph).await.is_sentinel());
    }

    #[tokio::test]
    async fn test_lookup_garbage_yields_sentinel() {
        let fetcher = CharacterFetcher::new(FixedBackend(Some("not json at all")));
        assert!(fetcher.lookup(Glyph::new('木')).await.is_sentinel());
    }
}
