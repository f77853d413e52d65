//! Tutor Client
//!
//! Thin wrapper around the Tutor for TUI integration.
//! This client embeds the Tutor directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any learning logic.
//! All orchestration happens in the Tutor. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to the Tutor
//! 3. Receive TutorMessages
//! 4. Render display state based on messages

use std::time::Instant;

use tokio::sync::mpsc;

use tutor_core::{
    BihuaConfig, BoardConfig, BoardFrame, CdnStrokeSource, CommandSpeech, GeminiBackend,
    LlmBackend, Point, Session, SilentSpeech, SpeakTarget, SpeechSynthesizer, StrokeSource,
    SurfaceEvent, SurfaceType, Tutor, TutorConfig, TutorMessage, TutorState,
};

/// Capacity of the Tutor -> TUI channel
const MESSAGE_CHANNEL_CAPACITY: usize = 100;

/// Client for communicating with the embedded Tutor
pub struct TutorClient<B: LlmBackend, S: StrokeSource> {
    /// The embedded Tutor instance
    tutor: Tutor<B, S>,
    /// Receiver for messages from the Tutor
    rx: mpsc::Receiver<TutorMessage>,
}

impl TutorClient<GeminiBackend, CdnStrokeSource> {
    /// Build the production client: Gemini details, CDN strokes, command TTS
    pub fn from_config(config: &BihuaConfig) -> anyhow::Result<Self> {
        let backend = GeminiBackend::from_config(&config.backend_config(), config.request_timeout)?;
        let strokes = CdnStrokeSource::new(config.stroke_base_url.clone(), config.stroke_timeout)?;

        let speech: Box<dyn SpeechSynthesizer> = if config.speech_enabled {
            Box::new(CommandSpeech::new(config.speech_command.clone()))
        } else {
            tracing::info!("Speech disabled by configuration");
            Box::new(SilentSpeech)
        };

        Ok(Self::new(backend, strokes, speech, config.tutor_config()))
    }
}

impl<B: LlmBackend + 'static, S: StrokeSource + 'static> TutorClient<B, S> {
    /// Create a client around a new Tutor
    pub fn new(
        backend: B,
        strokes: S,
        speech: Box<dyn SpeechSynthesizer>,
        config: TutorConfig,
    ) -> Self {
        // Create channel for Tutor -> TUI messages
        let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
        let tutor = Tutor::new(backend, strokes, speech, config, tx);
        Self { tutor, rx }
    }

    /// Start the Tutor (loads the default character)
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.tutor.start().await
    }

    /// Connect this surface to the Tutor
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Connected {
            surface_type: SurfaceType::Tui,
        })
        .await
    }

    /// Submit the input field's value
    pub async fn submit(&mut self, input: String) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Submit { input }).await
    }

    /// Replay the stroke animation
    pub async fn animate(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Animate).await
    }

    /// Switch the board to quiz mode
    pub async fn quiz(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Quiz).await
    }

    /// Notify the Tutor that the board was clicked
    pub async fn board_clicked(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::BoardClicked).await
    }

    /// Submit a stroke drawn on the board
    pub async fn quiz_stroke(&mut self, points: Vec<Point>) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::QuizStroke { points }).await
    }

    /// Read part of the record aloud
    pub async fn speak(&mut self, target: SpeakTarget) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::Speak { target }).await
    }

    /// Notify the Tutor that the user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.send_event(SurfaceEvent::QuitRequested).await
    }

    /// Poll for finished lookups and board loads (must be called regularly)
    pub async fn poll(&mut self) -> bool {
        self.tutor.poll().await
    }

    /// Receive all pending messages from the Tutor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<TutorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Tutor state
    pub fn state(&self) -> TutorState {
        self.tutor.state()
    }

    /// The learning session
    pub fn session(&self) -> &Session {
        self.tutor.session()
    }

    /// Board appearance and timing
    pub fn board_config(&self) -> &BoardConfig {
        self.tutor.board().config()
    }

    /// Whether stroke data is still loading
    pub fn board_loading(&self) -> bool {
        self.tutor.board().is_loading()
    }

    /// Whether the board is in quiz mode
    pub fn in_quiz(&self) -> bool {
        self.tutor.board().in_quiz()
    }

    /// Board snapshot for rendering
    pub fn board_frame(&self, now: Instant) -> Option<BoardFrame<'_>> {
        self.tutor.board().frame(now)
    }

    /// Send raw surface event to the Tutor
    pub async fn send_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        self.tutor.handle_event(event).await
    }
}
