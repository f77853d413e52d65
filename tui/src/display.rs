//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from TutorMessages and used for rendering.
//!
//! The TUI is a "thin client" - it just renders what the Tutor tells it to.
//! Display state is the bridge between TutorMessages and rendering.

use std::time::Duration;

use tutor_core::{
    CharacterRecord, Glyph, LookupSeq, NotifyLevel, PanelView, QuizOutcome, TutorMessage,
    TutorState,
};

/// How long a notification stays in the status bar
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// What the board area should show around the canvas
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardStatus {
    /// Nothing requested yet
    Empty,
    /// Stroke data is loading
    Loading(Glyph),
    /// Strokes are on the board
    Ready(Glyph),
    /// Stroke data could not be loaded
    Failed {
        /// The glyph that failed
        glyph: Glyph,
        /// Error description
        error: String,
    },
}

impl BoardStatus {
    /// Whether the loading overlay should be drawn
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// A notification to display
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// Time left before it disappears
    pub remaining: Duration,
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Tutor state
    pub tutor_state: TutorState,
    /// Model used for lookups
    pub session_model: String,
    /// Character currently selected
    pub current_char: Option<Glyph>,
    /// Details of the current character
    pub record: Option<CharacterRecord>,
    /// Whether a lookup is in flight
    pub loading: bool,
    /// Latest lookup issued
    pub latest_seq: Option<LookupSeq>,
    /// Board status
    pub board: BoardStatus,
    /// Result of the last stroke drawn in quiz mode
    pub quiz_feedback: Option<QuizOutcome>,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Goodbye message sent with Quit
    pub goodbye: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            tutor_state: TutorState::Idle,
            session_model: String::new(),
            current_char: None,
            record: None,
            loading: false,
            latest_seq: None,
            board: BoardStatus::Empty,
            quiz_feedback: None,
            notification: None,
            goodbye: None,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a TutorMessage to update display state
    pub fn apply_message(&mut self, msg: TutorMessage) {
        match msg {
            TutorMessage::State { state } => {
                self.tutor_state = state;
            }
            TutorMessage::SessionInfo {
                model,
                current_char,
            } => {
                self.session_model = model;
                self.current_char = Some(current_char);
            }
            TutorMessage::CharacterChanged { glyph } => {
                self.current_char = Some(glyph);
                self.board = BoardStatus::Loading(glyph);
                self.quiz_feedback = None;
            }
            TutorMessage::LookupStarted { seq, .. } => {
                self.loading = true;
                self.latest_seq = Some(seq);
            }
            TutorMessage::DetailsReady { seq, record } => {
                if self.latest_seq.is_some_and(|latest| latest != seq) {
                    tracing::debug!(seq = seq.0, "Ignoring details for an older lookup");
                    return;
                }
                self.record = Some(record);
                self.loading = false;
            }
            TutorMessage::BoardReady { glyph } => {
                self.board = BoardStatus::Ready(glyph);
            }
            TutorMessage::BoardFailed { glyph, error } => {
                self.board = BoardStatus::Failed { glyph, error };
            }
            TutorMessage::QuizProgress { outcome } => {
                self.quiz_feedback = Some(outcome);
            }
            TutorMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
            TutorMessage::Quit { message } => {
                // The app will handle quitting
                self.goodbye = message;
            }
        }
    }

    /// What the detail panel shows
    pub fn panel(&self) -> PanelView<'_> {
        PanelView::of(self.record.as_ref(), self.loading)
    }

    /// Update timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(notification) = &mut self.notification {
            notification.remaining = notification.remaining.saturating_sub(delta);
            if notification.remaining.is_zero() {
                self.notification = None;
            }
        }
    }

    /// Whether the Tutor asked the surface to exit
    pub fn is_shutting_down(&self) -> bool {
        self.tutor_state == TutorState::ShuttingDown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(c: &str) -> CharacterRecord {
        CharacterRecord {
            char: c.to_string(),
            pinyin: "māo".to_string(),
            definition: "cat".to_string(),
            example: "我有一只猫。".to_string(),
            example_translation: "I have a cat.".to_string(),
        }
    }

    #[test]
    fn test_display_state_default() {
        let state = DisplayState::new();
        assert_eq!(state.tutor_state, TutorState::Idle);
        assert_eq!(state.board, BoardStatus::Empty);
        assert!(state.record.is_none());
        assert!(!state.loading);
        assert_eq!(state.panel(), PanelView::Empty);
    }

    #[test]
    fn test_lookup_lifecycle() {
        let mut state = DisplayState::new();
        let cat = Glyph::new('猫');

        state.apply_message(TutorMessage::CharacterChanged { glyph: cat });
        state.apply_message(TutorMessage::LookupStarted {
            glyph: cat,
            seq: LookupSeq(1),
        });
        assert!(state.loading);
        assert_eq!(state.panel(), PanelView::Loading);
        assert!(state.board.is_loading());

        let details = record("猫");
        state.apply_message(TutorMessage::DetailsReady {
            seq: LookupSeq(1),
            record: details.clone(),
        });
        assert!(!state.loading);
        assert_eq!(state.panel(), PanelView::Populated(&details));
    }

    #[test]
    fn test_older_details_ignored() {
        let mut state = DisplayState::new();
        state.apply_message(TutorMessage::LookupStarted {
            glyph: Glyph::new('水'),
            seq: LookupSeq(2),
        });
        state.apply_message(TutorMessage::DetailsReady {
            seq: LookupSeq(1),
            record: record("猫"),
        });
        assert!(state.loading);
        assert!(state.record.is_none());
    }

    #[test]
    fn test_board_status_messages() {
        let mut state = DisplayState::new();
        let fire = Glyph::new('火');

        state.apply_message(TutorMessage::CharacterChanged { glyph: fire });
        assert_eq!(state.board, BoardStatus::Loading(fire));

        state.apply_message(TutorMessage::BoardReady { glyph: fire });
        assert_eq!(state.board, BoardStatus::Ready(fire));

        state.apply_message(TutorMessage::BoardFailed {
            glyph: fire,
            error: "not found".to_string(),
        });
        assert_eq!(
            state.board,
            BoardStatus::Failed {
                glyph: fire,
                error: "not found".to_string()
            }
        );
    }

    #[test]
    fn test_character_change_clears_quiz_feedback() {
        let mut state = DisplayState::new();
        state.apply_message(TutorMessage::QuizProgress {
            outcome: QuizOutcome::Correct { stroke: 0 },
        });
        assert!(state.quiz_feedback.is_some());

        state.apply_message(TutorMessage::CharacterChanged {
            glyph: Glyph::new('一'),
        });
        assert!(state.quiz_feedback.is_none());
    }

    #[test]
    fn test_notification_expires() {
        let mut state = DisplayState::new();
        state.apply_message(TutorMessage::Notify {
            level: NotifyLevel::Warning,
            message: "语音不可用".to_string(),
        });

        state.update(Duration::from_secs(2));
        assert!(state.notification.is_some());

        state.update(Duration::from_secs(3));
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_quit_records_goodbye() {
        let mut state = DisplayState::new();
        state.apply_message(TutorMessage::State {
            state: TutorState::ShuttingDown,
        });
        state.apply_message(TutorMessage::Quit {
            message: Some("再见!".to_string()),
        });
        assert!(state.is_shutting_down());
        assert_eq!(state.goodbye.as_deref(), Some("再见!"));
    }
}
