//! Stroke Data Sources
//!
//! Where the board gets stroke data from. The default source fetches the
//! per-character JSON files of the `hanzi-writer-data` package from a CDN and
//! keeps successful loads in memory for the rest of the session.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use super::data::CharacterStrokes;
use crate::glyph::Glyph;

/// Default CDN location of the stroke data set
pub const DEFAULT_STROKE_CDN: &str = "https://cdn.jsdelivr.net/npm/hanzi-writer-data@2.0";

/// Errors loading or interpreting stroke data
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StrokeError {
    /// The data set has no entry for this character
    #[error("no stroke data for '{0}'")]
    UnknownCharacter(Glyph),

    /// The data could not be fetched
    #[error("failed to fetch stroke data: {0}")]
    Fetch(String),

    /// The data was fetched but is not usable
    #[error("malformed stroke data: {0}")]
    Malformed(String),
}

/// Provider of stroke data
#[async_trait]
pub trait StrokeSource: Send + Sync {
    /// Load stroke data for `glyph`
    async fn load(&self, glyph: Glyph) -> Result<CharacterStrokes, StrokeError>;
}

/// Stroke data fetched over HTTP from the `hanzi-writer-data` CDN
pub struct CdnStrokeSource {
    /// Base URL; `{base}/{char}.json` is requested
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
    /// Successful loads
    cache: Mutex<HashMap<Glyph, CharacterStrokes>>,
}

impl CdnStrokeSource {
    /// Create a source for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// URL of the data file for `glyph`
    fn url_for(&self, glyph: Glyph) -> String {
        format!("{}/{}.json", self.base_url, glyph)
    }
}

#[async_trait]
impl StrokeSource for CdnStrokeSource {
    async fn load(&self, glyph: Glyph) -> Result<CharacterStrokes, StrokeError> {
        let cached = self.cache.lock().get(&glyph).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let response = self
            .http_client
            .get(self.url_for(glyph))
            .send()
            .await
            .map_err(|e| StrokeError::Fetch(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StrokeError::UnknownCharacter(glyph));
        }
        if !status.is_success() {
            return Err(StrokeError::Fetch(format!("CDN returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StrokeError::Fetch(e.to_string()))?;
        let strokes: CharacterStrokes =
            serde_json::from_str(&body).map_err(|e| StrokeError::Malformed(e.to_string()))?;

        tracing::debug!(glyph = %glyph, strokes = strokes.len(), "Loaded stroke data");
        self.cache.lock().insert(glyph, strokes.clone());
        Ok(strokes)
    }
}
