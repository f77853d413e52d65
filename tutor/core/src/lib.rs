//! Tutor Core - Headless Orchestration for bihua
//!
//! This crate provides everything the stroke-order tutor does, independent of
//! any UI framework. A terminal surface drives it today; tests drive it
//! headless.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      UI Surface (TUI)                      │
//! │            SurfaceEvent (up)   TutorMessage (down)         │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┴─────────────────────────────┐
//! │                         TUTOR CORE                         │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │                        Tutor                         │  │
//! │  │  ┌─────────┐  ┌───────────┐  ┌────────┐  ┌────────┐ │  │
//! │  │  │ Session │  │  Fetcher  │  │ Stroke │  │ Speech │ │  │
//! │  │  │         │  │ (Gemini)  │  │ Board  │  │        │ │  │
//! │  │  └─────────┘  └───────────┘  └────────┘  └────────┘ │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use tutor_core::{
//!     load_config, CdnStrokeSource, GeminiBackend, SilentSpeech, SurfaceEvent, SurfaceType,
//!     Tutor,
//! };
//! use tokio::sync::mpsc;
//!
//! let config = load_config()?;
//! let (tx, mut rx) = mpsc::channel(100);
//! let backend = GeminiBackend::from_config(&config.backend_config(), config.request_timeout)?;
//! let strokes = CdnStrokeSource::new(&config.stroke_base_url, config.stroke_timeout)?;
//! let mut tutor = Tutor::new(backend, strokes, Box::new(SilentSpeech), config.tutor_config(), tx);
//!
//! tutor.start().await?;
//! tutor.handle_event(SurfaceEvent::Connected { surface_type: SurfaceType::Headless }).await?;
//!
//! loop {
//!     tutor.poll().await;
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message to UI
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Model backend abstraction (Gemini)
//! - [`config`]: TOML configuration file and environment overrides
//! - [`events`]: Events from UI surfaces to the Tutor
//! - [`fetcher`]: Character detail lookups with a fallback record
//! - [`glyph`]: The single-character newtype
//! - [`messages`]: Messages from the Tutor to UI surfaces
//! - [`panel`]: What the detail panel shows
//! - [`record`]: Character learning data
//! - [`session`]: Per-run learning session
//! - [`speech`]: Text-to-speech output
//! - [`strokes`]: Stroke data, animation, quiz and the board
//! - [`tutor`]: Main Tutor struct
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod events;
pub mod fetcher;
pub mod glyph;
pub mod messages;
pub mod panel;
pub mod record;
pub mod session;
pub mod speech;
pub mod strokes;
pub mod tutor;

// Re-exports for convenience
pub use backend::{BackendConfig, GeminiBackend, LlmBackend, LlmRequest, LlmResponse};
pub use events::{SurfaceEvent, SurfaceType};
pub use fetcher::{CharacterFetcher, LookupError};
pub use glyph::Glyph;
pub use messages::{LookupSeq, NotifyLevel, TutorMessage, TutorState};
pub use panel::{PanelView, SpeakTarget};
pub use record::CharacterRecord;
pub use session::Session;
pub use speech::{CommandSpeech, SilentSpeech, SpeechError, SpeechSynthesizer, Utterance};
pub use strokes::{
    BoardConfig, BoardEvent, BoardFrame, BoardHandle, CdnStrokeSource, CharacterStrokes,
    FrameStroke, Point, QuizOutcome, QuizStatus, StrokeBoard, StrokeError, StrokeGeometry,
    StrokeSource,
};
pub use tutor::{Tutor, TutorConfig};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, BihuaConfig, BihuaToml,
    ConfigError, ConfigOverrides, ConfigSource,
};
