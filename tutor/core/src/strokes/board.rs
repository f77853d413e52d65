//! Stroke Board
//!
//! The board owns one drawable character at a time. Changing the character
//! tears the current instance down and builds a new one: stroke data is
//! loaded in the background and, once it has actually arrived, the board
//! plays the stroke animation once and reports itself ready.
//!
//! # Ready contract
//!
//! [`BoardEvent::Ready`] is emitted only after stroke data for the glyph has
//! been loaded and turned into geometry. A glyph the data set does not know
//! produces [`BoardEvent::Failed`] instead and leaves the board empty.
//!
//! # Generations
//!
//! Every rebuild bumps a generation counter. Load completions and
//! [`BoardHandle`]s from older generations are ignored, so a slow load for a
//! previous character can never replace the current one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::animation::StrokeAnimation;
use super::data::{CharacterStrokes, Point, StrokeGeometry};
use super::quiz::{Quiz, QuizOutcome};
use super::source::{StrokeError, StrokeSource};
use crate::glyph::Glyph;

/// Board appearance and timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Drawable width in surface units
    pub width: u32,
    /// Drawable height in surface units
    pub height: u32,
    /// Padding around the character in surface units
    pub padding: u32,
    /// Whether to draw the grey outline of the character
    pub show_outline: bool,
    /// Stroke animation speed multiplier
    pub stroke_animation_speed: f64,
    /// Pause between strokes during animation, in milliseconds
    pub delay_between_strokes_ms: u64,
    /// Colour for radical strokes (`#rrggbb`)
    pub radical_color: String,
    /// Colour for other strokes (`#rrggbb`)
    pub stroke_color: String,
    /// Misses on one stroke before the quiz hints it (0 = never)
    pub show_hint_after_misses: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            padding: 20,
            show_outline: true,
            stroke_animation_speed: 1.0,
            delay_between_strokes_ms: 200,
            radical_color: "#10b981".to_string(),
            stroke_color: "#334155".to_string(),
            show_hint_after_misses: 3,
        }
    }
}

impl BoardConfig {
    /// Padding as a fraction of the smaller side
    #[must_use]
    pub fn padding_fraction(&self) -> f64 {
        let side = self.width.min(self.height).max(1);
        (f64::from(self.padding) / f64::from(side)).clamp(0.0, 0.45)
    }

    /// Animation of `strokes` starting at `now`, timed by this config
    fn animation_for(&self, strokes: &[StrokeGeometry], now: Instant) -> StrokeAnimation {
        let lengths: Vec<f64> = strokes.iter().map(|s| s.median_length).collect();
        StrokeAnimation::new(
            &lengths,
            self.stroke_animation_speed,
            Duration::from_millis(self.delay_between_strokes_ms),
            now,
        )
    }
}

/// Control handle for the current board instance
///
/// Handed to the application shell with [`BoardEvent::Ready`]. Operations
/// through a handle from an older instance are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardHandle {
    generation: u64,
    glyph: Glyph,
}

impl BoardHandle {
    /// The glyph this handle controls
    #[must_use]
    pub fn glyph(&self) -> Glyph {
        self.glyph
    }
}

/// Lifecycle notifications from the board
#[derive(Clone, Debug, PartialEq)]
pub enum BoardEvent {
    /// Stroke data loaded; the first animation has started
    Ready {
        /// The loaded glyph
        glyph: Glyph,
        /// Handle for animate/quiz
        handle: BoardHandle,
    },
    /// Stroke data could not be loaded; the board stays empty
    Failed {
        /// The glyph that failed
        glyph: Glyph,
        /// Why it failed
        error: StrokeError,
    },
}

/// What the board is currently doing
#[derive(Clone, Debug)]
enum BoardMode {
    /// Playing (or finished playing) the stroke animation
    Animating(StrokeAnimation),
    /// Waiting for the learner to draw strokes
    Quiz {
        quiz: Quiz,
        last_outcome: Option<QuizOutcome>,
    },
}

/// A fully loaded character
struct BoardInstance {
    glyph: Glyph,
    generation: u64,
    strokes: Vec<StrokeGeometry>,
    mode: BoardMode,
}

/// Completed background load
struct LoadResult {
    generation: u64,
    glyph: Glyph,
    result: Result<CharacterStrokes, StrokeError>,
}

/// Quiz status in a rendered frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizStatus {
    /// Strokes accepted so far
    pub completed: usize,
    /// Total strokes
    pub total: usize,
    /// Stroke being hinted, if any
    pub hinted: Option<usize>,
    /// Result of the latest drawn stroke
    pub last_outcome: Option<QuizOutcome>,
}

/// One stroke in a rendered frame
#[derive(Clone, Copy, Debug)]
pub struct FrameStroke<'a> {
    /// Geometry to draw
    pub geometry: &'a StrokeGeometry,
    /// How much of the stroke is revealed (0.0..=1.0)
    pub reveal: f32,
}

/// Surface-agnostic snapshot of the board at one instant
#[derive(Clone, Debug)]
pub struct BoardFrame<'a> {
    /// The drawn glyph
    pub glyph: Glyph,
    /// Whether to draw the outline under the strokes
    pub show_outline: bool,
    /// Every stroke with its reveal fraction
    pub strokes: Vec<FrameStroke<'a>>,
    /// Stroke currently animating, if any
    pub active_stroke: Option<usize>,
    /// Quiz status when in quiz mode
    pub quiz: Option<QuizStatus>,
}

/// Interactive stroke-order board
pub struct StrokeBoard<S: StrokeSource> {
    /// Stroke data provider
    source: Arc<S>,
    /// Appearance and timing
    config: BoardConfig,
    /// Current generation
    generation: u64,
    /// Glyph whose data is being loaded
    loading: Option<Glyph>,
    /// Loaded character
    instance: Option<BoardInstance>,
    /// In-flight load task
    load_task: Option<JoinHandle<()>>,
    /// Load completions
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
}

impl<S: StrokeSource + 'static> StrokeBoard<S> {
    /// Create an empty board
    pub fn new(source: S, config: BoardConfig) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            config,
            generation: 0,
            loading: None,
            instance: None,
            load_task: None,
            load_tx,
            load_rx,
        }
    }

    /// Board configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Whether stroke data is being loaded
    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Glyph currently shown, if loaded
    pub fn glyph(&self) -> Option<Glyph> {
        self.instance.as_ref().map(|i| i.glyph)
    }

    /// Whether the board is in quiz mode
    pub fn in_quiz(&self) -> bool {
        matches!(
            self.instance.as_ref().map(|i| &i.mode),
            Some(BoardMode::Quiz { .. })
        )
    }

    /// Discard the current instance and start building one for `glyph`
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_character(&mut self, glyph: Glyph) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }

        self.generation += 1;
        self.instance = None;
        self.loading = Some(glyph);

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let tx = self.load_tx.clone();

        tracing::debug!(glyph = %glyph, generation, "Rebuilding board");

        self.load_task = Some(tokio::spawn(async move {
            let result = source.load(glyph).await;
            let _ = tx.send(LoadResult {
                generation,
                glyph,
                result,
            });
        }));
    }

    /// Apply finished loads; returns lifecycle events in arrival order
    pub fn poll(&mut self, now: Instant) -> Vec<BoardEvent> {
        let mut events = Vec::new();

        while let Ok(load) = self.load_rx.try_recv() {
            if load.generation != self.generation {
                tracing::debug!(glyph = %load.glyph, "Dropping stroke data for replaced board");
                continue;
            }
            self.loading = None;
            self.load_task = None;

            match load.result.and_then(|data| data.geometry()) {
                Ok(strokes) => {
                    let animation = self.config.animation_for(&strokes, now);
                    self.instance = Some(BoardInstance {
                        glyph: load.glyph,
                        generation: load.generation,
                        strokes,
                        mode: BoardMode::Animating(animation),
                    });
                    tracing::info!(glyph = %load.glyph, "Board ready");
                    events.push(BoardEvent::Ready {
                        glyph: load.glyph,
                        handle: BoardHandle {
                            generation: load.generation,
                            glyph: load.glyph,
                        },
                    });
                }
                Err(error) => {
                    tracing::warn!(glyph = %load.glyph, error = %error, "Failed to build board");
                    events.push(BoardEvent::Failed {
                        glyph: load.glyph,
                        error,
                    });
                }
            }
        }

        events
    }

    /// Restart the stroke animation from the first stroke
    ///
    /// Leaves quiz mode. Returns `false` for a stale handle.
    pub fn animate(&mut self, handle: BoardHandle, now: Instant) -> bool {
        let config = self.config.clone();
        let Some(instance) = self.instance_for(handle) else {
            return false;
        };
        let animation = config.animation_for(&instance.strokes, now);
        tracing::debug!(
            glyph = %instance.glyph,
            duration_ms = animation.total_duration().as_millis(),
            "Replaying stroke animation"
        );
        instance.mode = BoardMode::Animating(animation);
        true
    }

    /// Enter quiz mode
    ///
    /// Returns `false` for a stale handle.
    pub fn quiz(&mut self, handle: BoardHandle) -> bool {
        let hint_after = self.config.show_hint_after_misses;
        let Some(instance) = self.instance_for(handle) else {
            return false;
        };
        instance.mode = BoardMode::Quiz {
            quiz: Quiz::new(instance.strokes.len(), hint_after),
            last_outcome: None,
        };
        true
    }

    /// The drawable surface was clicked: replay the animation
    ///
    /// Ignored in quiz mode, where clicks are part of drawing.
    pub fn click(&mut self, now: Instant) {
        if let Some(BoardInstance {
            mode: BoardMode::Animating(animation),
            ..
        }) = self.instance.as_mut()
        {
            animation.restart(now);
        }
    }

    /// Submit a drawn stroke (normalized points) while in quiz mode
    pub fn submit_stroke(&mut self, points: &[Point]) -> Option<QuizOutcome> {
        let instance = self.instance.as_mut()?;
        let BoardMode::Quiz { quiz, last_outcome } = &mut instance.mode else {
            return None;
        };
        let outcome = quiz.submit(points, &instance.strokes)?;
        tracing::debug!(glyph = %instance.glyph, ?outcome, "Quiz stroke");
        *last_outcome = Some(outcome);
        Some(outcome)
    }

    /// Snapshot for rendering at `now`; `None` when nothing is loaded
    pub fn frame(&self, now: Instant) -> Option<BoardFrame<'_>> {
        let instance = self.instance.as_ref()?;

        let (reveal, active_stroke, quiz) = match &instance.mode {
            BoardMode::Animating(animation) => (
                animation.progress_at(now),
                animation.active_stroke(now),
                None,
            ),
            BoardMode::Quiz { quiz, last_outcome } => {
                let done = quiz.completed_strokes();
                let reveal = (0..instance.strokes.len())
                    .map(|i| if i < done { 1.0 } else { 0.0 })
                    .collect();
                let status = QuizStatus {
                    completed: done,
                    total: instance.strokes.len(),
                    hinted: quiz.hinted_stroke(),
                    last_outcome: *last_outcome,
                };
                (reveal, None, Some(status))
            }
        };

        Some(BoardFrame {
            glyph: instance.glyph,
            show_outline: self.config.show_outline,
            strokes: instance
                .strokes
                .iter()
                .zip(reveal)
                .map(|(geometry, reveal)| FrameStroke { geometry, reveal })
                .collect(),
            active_stroke,
            quiz,
        })
    }

    fn instance_for(&mut self, handle: BoardHandle) -> Option<&mut BoardInstance> {
        self.instance
            .as_mut()
            .filter(|i| i.generation == handle.generation)
    }
}
