//! TOML Configuration File Support
//!
//! Configuration is read from `~/.config/bihua/config.toml` (XDG config dir).
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [gemini]
//! api_key = "..."
//! model = "gemini-2.5-flash"
//! temperature = 0.3
//! timeout_secs = 60
//!
//! [strokes]
//! base_url = "https://cdn.jsdelivr.net/npm/hanzi-writer-data@2.0"
//!
//! [board]
//! stroke_animation_speed = 1.5
//! show_hint_after_misses = 3
//!
//! [speech]
//! enabled = true
//! command = "espeak-ng"
//! rate = 0.8
//!
//! [tutor]
//! default_character = "猫"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendConfig, DEFAULT_GEMINI_BASE_URL};
use crate::fetcher::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::glyph::Glyph;
use crate::speech::{DEFAULT_SPEECH_COMMAND, DEFAULT_SPEECH_RATE};
use crate::strokes::{BoardConfig, DEFAULT_STROKE_CDN};
use crate::tutor::{TutorConfig, DEFAULT_CHARACTER};

// =============================================================================
// Error Types
// =============================================================================

/// Default model request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Gemini section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiToml {
    /// API key
    pub api_key: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Stroke data section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokesToml {
    /// Base URL of the stroke data set
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Speech section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechToml {
    /// Whether the audio controls speak at all
    pub enabled: Option<bool>,

    /// Text-to-speech command
    pub command: Option<String>,

    /// Speaking rate (1.0 = normal)
    pub rate: Option<f32>,
}

/// Tutor section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorToml {
    /// Character looked up on start
    pub default_character: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BihuaToml {
    /// Gemini configuration section
    pub gemini: GeminiToml,

    /// Stroke data configuration section
    pub strokes: StrokesToml,

    /// Board configuration section (missing fields use defaults)
    pub board: Option<BoardConfig>,

    /// Speech configuration section
    pub speech: SpeechToml,

    /// Tutor configuration section
    pub tutor: TutorToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for bihua
#[derive(Clone, Debug)]
pub struct BihuaConfig {
    /// Gemini API key (empty = lookups fall back)
    pub api_key: String,

    /// Gemini model
    pub model: String,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Model request timeout
    pub request_timeout: Duration,

    /// Stroke data base URL
    pub stroke_base_url: String,

    /// Stroke data request timeout
    pub stroke_timeout: Duration,

    /// Board appearance and timing
    pub board: BoardConfig,

    /// Whether speech is enabled
    pub speech_enabled: bool,

    /// Text-to-speech command
    pub speech_command: String,

    /// Speaking rate
    pub speech_rate: f32,

    /// Character looked up on start
    pub default_character: Glyph,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for BihuaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            stroke_base_url: DEFAULT_STROKE_CDN.to_string(),
            stroke_timeout: Duration::from_secs(15),
            board: BoardConfig::default(),
            speech_enabled: true,
            speech_command: DEFAULT_SPEECH_COMMAND.to_string(),
            speech_rate: DEFAULT_SPEECH_RATE,
            default_character: Glyph::new(DEFAULT_CHARACTER),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl BihuaConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Backend settings for the model client
    #[must_use]
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::Gemini {
            api_key: self.api_key.clone(),
            base_url: self.gemini_base_url.clone(),
        }
    }

    /// Settings for the Tutor
    #[must_use]
    pub fn tutor_config(&self) -> TutorConfig {
        TutorConfig {
            default_character: self.default_character,
            model: self.model.clone(),
            temperature: self.temperature,
            speech_rate: self.speech_rate,
            board: self.board.clone(),
        }
    }

    /// Check values that cannot be used as given
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.stroke_animation_speed <= 0.0 {
            return Err(ConfigError::ValidationError(
                "board.stroke_animation_speed must be positive".to_string(),
            ));
        }
        if self.speech_rate <= 0.0 {
            return Err(ConfigError::ValidationError(
                "speech.rate must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/bihua/config.toml` or
/// `~/.config/bihua/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bihua").join("config.toml"))
}

/// Load configuration from the default path and the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<BihuaConfig, ConfigError> {
    let mut config = load_config_from_path(default_config_path())?;
    ConfigOverrides::from_env().apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific path, without environment overrides
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<BihuaConfig, ConfigError> {
    let mut config = BihuaConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: BihuaToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut BihuaConfig, toml: &BihuaToml) -> Result<(), ConfigError> {
    // Gemini settings
    if let Some(ref key) = toml.gemini.api_key {
        config.api_key = key.clone();
    }
    if let Some(ref model) = toml.gemini.model {
        config.model = model.clone();
    }
    if let Some(ref url) = toml.gemini.base_url {
        config.gemini_base_url = url.clone();
    }
    if let Some(temperature) = toml.gemini.temperature {
        config.temperature = temperature;
    }
    if let Some(secs) = toml.gemini.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    // Stroke data settings
    if let Some(ref url) = toml.strokes.base_url {
        config.stroke_base_url = url.clone();
    }
    if let Some(secs) = toml.strokes.timeout_secs {
        config.stroke_timeout = Duration::from_secs(secs);
    }

    if let Some(ref board) = toml.board {
        config.board = board.clone();
    }

    // Speech settings
    if let Some(enabled) = toml.speech.enabled {
        config.speech_enabled = enabled;
    }
    if let Some(ref command) = toml.speech.command {
        config.speech_command = command.clone();
    }
    if let Some(rate) = toml.speech.rate {
        config.speech_rate = rate;
    }

    // Tutor settings
    if let Some(ref c) = toml.tutor.default_character {
        config.default_character = Glyph::first_of(c).ok_or_else(|| {
            ConfigError::ValidationError("tutor.default_character is empty".to_string())
        })?;
    }

    Ok(())
}

// =============================================================================
// Environment Overrides
// =============================================================================

/// Overrides applied on top of the file configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// API key override
    pub api_key: Option<String>,

    /// Model override
    pub model: Option<String>,

    /// Stroke data base URL override
    pub stroke_base_url: Option<String>,

    /// Speech command override
    pub speech_command: Option<String>,

    /// Disable speech
    pub no_speech: bool,
}

impl ConfigOverrides {
    /// Read overrides from the process environment
    ///
    /// `GEMINI_API_KEY` wins over `API_KEY`. Also reads `BIHUA_MODEL`,
    /// `BIHUA_STROKE_CDN`, `BIHUA_SPEECH_COMMAND` and `BIHUA_NO_SPEECH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: non_empty("BIHUA_MODEL"),
            stroke_base_url: non_empty("BIHUA_STROKE_CDN"),
            speech_command: non_empty("BIHUA_SPEECH_COMMAND"),
            no_speech: non_empty("BIHUA_NO_SPEECH")
                .is_some_and(|v| v != "0" && v.to_lowercase() != "false"),
        }
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.model.is_none()
            && self.stroke_base_url.is_none()
            && self.speech_command.is_none()
            && !self.no_speech
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut BihuaConfig) {
        if self.is_empty() {
            return;
        }
        config.source = ConfigSource::Env;

        if let Some(ref key) = self.api_key {
            config.api_key = key.clone();
        }
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(ref url) = self.stroke_base_url {
            config.stroke_base_url = url.clone();
        }
        if let Some(ref command) = self.speech_command {
            config.speech_command = command.clone();
        }
        if self.no_speech {
            config.speech_enabled = false;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
