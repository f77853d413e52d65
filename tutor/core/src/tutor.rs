//! Tutor - The Application Shell
//!
//! The Tutor owns the learning session and wires the pieces together:
//! - character lookups through the fetcher
//! - the stroke board for the selected character
//! - speech for the detail panel's audio controls
//! - communication with UI surfaces
//!
//! Like every surface-facing type in this crate it is UI-agnostic. Surfaces
//! send [`SurfaceEvent`]s in, receive [`TutorMessage`]s out, and call
//! [`Tutor::poll`] every frame so background completions get applied.
//!
//! # Lookup ordering
//!
//! Each lookup carries a [`LookupSeq`]. Only the completion of the most
//! recently issued lookup is applied; older ones are dropped when they
//! arrive, so quick successive submissions always end on the last glyph.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::backend::LlmBackend;
use crate::events::SurfaceEvent;
use crate::fetcher::{CharacterFetcher, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::glyph::Glyph;
use crate::messages::{LookupSeq, NotifyLevel, TutorMessage, TutorState};
use crate::panel::{PanelView, SpeakTarget};
use crate::record::CharacterRecord;
use crate::session::Session;
use crate::speech::{SpeechSynthesizer, DEFAULT_SPEECH_RATE};
use crate::strokes::{BoardConfig, BoardEvent, Point, StrokeBoard, StrokeSource};

/// Character looked up when the tutor starts
pub const DEFAULT_CHARACTER: char = '猫';

/// Tutor configuration
#[derive(Clone, Debug)]
pub struct TutorConfig {
    /// Character loaded on start
    pub default_character: Glyph,
    /// Model used for lookups
    pub model: String,
    /// Sampling temperature for lookups
    pub temperature: f32,
    /// Speaking rate for the audio controls
    pub speech_rate: f32,
    /// Board appearance and timing
    pub board: BoardConfig,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            default_character: Glyph::new(DEFAULT_CHARACTER),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            speech_rate: DEFAULT_SPEECH_RATE,
            board: BoardConfig::default(),
        }
    }
}

/// A finished lookup
struct LookupDone {
    seq: LookupSeq,
    glyph: Glyph,
    record: CharacterRecord,
}

/// The Tutor - headless application shell
pub struct Tutor<B: LlmBackend, S: StrokeSource> {
    /// Configuration
    config: TutorConfig,
    /// Character detail fetcher, shared with lookup tasks
    fetcher: Arc<CharacterFetcher<B>>,
    /// Stroke board
    board: StrokeBoard<S>,
    /// Speech output
    speech: Box<dyn SpeechSynthesizer>,
    /// Learning session
    session: Session,
    /// Current operational state
    state: TutorState,
    /// Most recently issued lookup
    latest_seq: LookupSeq,
    /// Whether the automatic first lookup was issued
    started: bool,
    /// Lookup completions
    lookup_tx: mpsc::UnboundedSender<LookupDone>,
    lookup_rx: mpsc::UnboundedReceiver<LookupDone>,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<TutorMessage>,
}

impl<B: LlmBackend + 'static, S: StrokeSource + 'static> Tutor<B, S> {
    /// Create a new Tutor
    pub fn new(
        backend: B,
        stroke_source: S,
        speech: Box<dyn SpeechSynthesizer>,
        config: TutorConfig,
        tx: mpsc::Sender<TutorMessage>,
    ) -> Self {
        let fetcher = CharacterFetcher::new(backend)
            .with_model(config.model.clone())
            .with_temperature(config.temperature);
        let board = StrokeBoard::new(stroke_source, config.board.clone());
        let (lookup_tx, lookup_rx) = mpsc::unbounded_channel();

        Self {
            session: Session::new(config.default_character),
            config,
            fetcher: Arc::new(fetcher),
            board,
            speech,
            state: TutorState::Idle,
            latest_seq: LookupSeq::default(),
            started: false,
            lookup_tx,
            lookup_rx,
            tx,
        }
    }

    /// Get current state
    pub fn state(&self) -> TutorState {
        self.state
    }

    /// Learning session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Stroke board, for rendering
    pub fn board(&self) -> &StrokeBoard<S> {
        &self.board
    }

    /// Model used for lookups
    pub fn model(&self) -> &str {
        self.fetcher.model()
    }

    /// Sequence number of the most recently issued lookup
    pub fn latest_seq(&self) -> LookupSeq {
        self.latest_seq
    }

    /// Start the Tutor: look up and draw the default character
    ///
    /// Only the first call does anything.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        if self.started {
            tracing::debug!("Tutor already started");
            return Ok(());
        }
        self.started = true;

        self.select(self.config.default_character).await;

        // Checked in the background so the first lookup is not held up
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if !fetcher.backend().health_check().await {
                tracing::warn!("Model backend not reachable");
                let _ = tx
                    .send(TutorMessage::Notify {
                        level: NotifyLevel::Warning,
                        message: "Model backend not reachable - details may be unavailable"
                            .to_string(),
                    })
                    .await;
            }
        });
        Ok(())
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::trace!(event = event.kind(), "Surface event");

        match event {
            SurfaceEvent::Connected { surface_type } => {
                tracing::info!(surface = surface_type.name(), "Surface connected");
                self.send(TutorMessage::State { state: self.state }).await;
                self.send(TutorMessage::SessionInfo {
                    model: self.fetcher.model().to_string(),
                    current_char: self.session.current_char(),
                })
                .await;
            }

            SurfaceEvent::Submit { input } => match Glyph::first_of(&input) {
                Some(glyph) => self.select(glyph).await,
                None => tracing::debug!("Ignoring empty submission"),
            },

            SurfaceEvent::Animate => {
                if let Some(handle) = self.session.board_handle() {
                    self.board.animate(handle, Instant::now());
                }
            }

            SurfaceEvent::Quiz => {
                if let Some(handle) = self.session.board_handle() {
                    self.board.quiz(handle);
                }
            }

            SurfaceEvent::BoardClicked => {
                self.board.click(Instant::now());
            }

            SurfaceEvent::QuizStroke { points } => {
                self.submit_stroke(&points).await;
            }

            SurfaceEvent::Speak { target } => {
                self.speak(target).await;
            }

            SurfaceEvent::QuitRequested => {
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    /// Apply finished lookups and board loads
    ///
    /// Call this regularly. Returns true if there was activity.
    pub async fn poll(&mut self) -> bool {
        let mut finished = Vec::new();
        while let Ok(done) = self.lookup_rx.try_recv() {
            finished.push(done);
        }
        let board_events = self.board.poll(Instant::now());
        let active = !finished.is_empty() || !board_events.is_empty();

        for done in finished {
            if done.seq != self.latest_seq {
                tracing::debug!(
                    glyph = %done.glyph,
                    seq = done.seq.0,
                    latest = self.latest_seq.0,
                    "Discarding stale lookup"
                );
                continue;
            }

            self.session.complete_lookup(done.record.clone());
            self.send(TutorMessage::DetailsReady {
                seq: done.seq,
                record: done.record,
            })
            .await;
            if self.state != TutorState::ShuttingDown {
                self.set_state(TutorState::Idle).await;
            }
        }

        for event in board_events {
            match event {
                BoardEvent::Ready { glyph, handle } => {
                    self.session.set_board_handle(handle);
                    self.send(TutorMessage::BoardReady { glyph }).await;
                }
                BoardEvent::Failed { glyph, error } => {
                    self.send(TutorMessage::BoardFailed {
                        glyph,
                        error: error.to_string(),
                    })
                    .await;
                    self.notify(NotifyLevel::Warning, &format!("无法绘制 {glyph}: {error}"))
                        .await;
                }
            }
        }

        active
    }

    /// Shut down the Tutor
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.speech.cancel_all();
        self.set_state(TutorState::ShuttingDown).await;
        self.send(TutorMessage::Quit {
            message: Some("再见!".to_string()),
        })
        .await;
        Ok(())
    }

    /// Select `glyph`: issue its lookup and rebuild the board
    async fn select(&mut self, glyph: Glyph) {
        self.latest_seq = self.latest_seq.next();
        let seq = self.latest_seq;
        self.session.begin_lookup(glyph);

        tracing::info!(glyph = %glyph, seq = seq.0, "Looking up character");

        self.send(TutorMessage::CharacterChanged { glyph }).await;
        self.send(TutorMessage::LookupStarted { glyph, seq }).await;
        self.set_state(TutorState::Fetching).await;

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.lookup_tx.clone();
        tokio::spawn(async move {
            let record = fetcher.lookup(glyph).await;
            let _ = tx.send(LookupDone { seq, glyph, record });
        });

        self.board.set_character(glyph);
    }

    /// Check a drawn stroke in quiz mode
    async fn submit_stroke(&mut self, points: &[Point]) {
        if let Some(outcome) = self.board.submit_stroke(points) {
            self.send(TutorMessage::QuizProgress { outcome }).await;
        }
    }

    /// Read part of the current record aloud
    async fn speak(&mut self, target: SpeakTarget) {
        let PanelView::Populated(record) =
            PanelView::of(self.session.data(), self.session.is_loading())
        else {
            tracing::debug!(?target, "No details shown, nothing to speak");
            return;
        };
        let utterance = target.utterance(record, self.config.speech_rate);

        self.speech.cancel_all();
        if let Err(e) = self.speech.speak(&utterance) {
            tracing::warn!(error = %e, "Speech failed");
            self.notify(NotifyLevel::Warning, &format!("语音不可用: {e}"))
                .await;
        }
    }

    /// Set state and notify UI
    async fn set_state(&mut self, state: TutorState) {
        self.state = state;
        self.send(TutorMessage::State { state }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(TutorMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: TutorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LlmRequest, LlmResponse};
    use crate::speech::SilentSpeech;
    use crate::strokes::{CharacterStrokes, StrokeError};

    struct MockBackend;

    #[async_trait::async_trait]
    impl LlmBackend for MockBackend {
        fn name(&self) -> &str {
            "Mock"
        }

        async fn health_check(&self) -> bool {
            true
        }

        async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
            Ok(LlmResponse {
                content: Some(
                    r#"{"pinyin":"māo","definition":"cat","example":"猫","exampleTranslation":"cat"}"#
                        .to_string(),
                ),
                model: request.model.clone(),
                tokens_used: None,
                duration_ms: None,
            })
        }
    }

    struct MockStrokes;

    #[async_trait::async_trait]
    impl StrokeSource for MockStrokes {
        async fn load(&self, _glyph: Glyph) -> Result<CharacterStrokes, StrokeError> {
            Ok(CharacterStrokes {
                strokes: vec!["M 100 100 L 900 100 L 900 200 Z".to_string()],
                medians: vec![vec![[120.0, 150.0], [880.0, 150.0]]],
                rad_strokes: vec![],
            })
        }
    }

    fn tutor() -> (Tutor<MockBackend, MockStrokes>, mpsc::Receiver<TutorMessage>) {
        let (tx, rx) = mpsc::channel(100);
        let tutor = Tutor::new(
            MockBackend,
            MockStrokes,
            Box::new(SilentSpeech),
            TutorConfig::default(),
            tx,
        );
        (tutor, rx)
    }

    async fn settle(tutor: &mut Tutor<MockBackend, MockStrokes>) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
            tutor.poll().await;
            if !tutor.session().is_loading() && tutor.session().board_handle().is_some() {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_tutor_creation() {
        let (tutor, _rx) = tutor();
        assert_eq!(tutor.state(), TutorState::Idle);
        assert_eq!(tutor.session().current_char(), Glyph::new('猫'));
        assert_eq!(tutor.latest_seq(), LookupSeq(0));
    }

    #[tokio::test]
    async fn test_start_once() {
        let (mut tutor, _rx) = tutor();
        tutor.start().await.unwrap();
        tutor.start().await.unwrap();
        assert_eq!(tutor.latest_seq(), LookupSeq(1));

        settle(&mut tutor).await;
        assert_eq!(tutor.state(), TutorState::Idle);
        assert_eq!(tutor.session().data().unwrap().char, "猫");
        assert!(tutor.session().board_handle().is_some());
    }

    #[tokio::test]
    async fn test_empty_submit_is_noop() {
        let (mut tutor, _rx) = tutor();
        tutor
            .handle_event(SurfaceEvent::Submit {
                input: "   ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(tutor.latest_seq(), LookupSeq(0));
        assert!(!tutor.session().is_loading());
    }

    #[tokio::test]
    async fn test_quit() {
        let (mut tutor, mut rx) = tutor();
        tutor.handle_event(SurfaceEvent::QuitRequested).await.unwrap();
        assert_eq!(tutor.state(), TutorState::ShuttingDown);

        let mut saw_quit = false;
        while let Ok(msg) = rx.try_recv() {
            saw_quit |= matches!(msg, TutorMessage::Quit { .. });
        }
        assert!(saw_quit);
    }
}
