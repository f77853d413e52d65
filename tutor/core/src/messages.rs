//! Tutor Messages
//!
//! Messages sent from the Tutor to UI surfaces. Surfaces keep no learning
//! logic of their own: they render what these messages tell them.

use serde::{Deserialize, Serialize};

use crate::glyph::Glyph;
use crate::record::CharacterRecord;
use crate::strokes::QuizOutcome;

/// Messages from Tutor to UI surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TutorMessage {
    /// Tutor state change
    State {
        /// The new state
        state: TutorState,
    },

    /// Session information (sent on connect)
    SessionInfo {
        /// Model used for lookups
        model: String,
        /// Character currently selected
        current_char: Glyph,
    },

    /// A new character was selected
    CharacterChanged {
        /// The selected glyph
        glyph: Glyph,
    },

    /// A lookup was issued
    LookupStarted {
        /// Glyph being looked up
        glyph: Glyph,
        /// Sequence number of the lookup
        seq: LookupSeq,
    },

    /// The latest lookup finished
    DetailsReady {
        /// Sequence number of the lookup
        seq: LookupSeq,
        /// The record (possibly the fallback record)
        record: CharacterRecord,
    },

    /// Stroke data loaded and the board is playing
    BoardReady {
        /// Glyph on the board
        glyph: Glyph,
    },

    /// Stroke data could not be loaded
    BoardFailed {
        /// Glyph that failed
        glyph: Glyph,
        /// Error description
        error: String,
    },

    /// Result of a stroke drawn in quiz mode
    QuizProgress {
        /// What happened
        outcome: QuizOutcome,
    },

    /// System notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

/// Identifies one lookup; later lookups have larger numbers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LookupSeq(pub u64);

impl LookupSeq {
    /// The following sequence number
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

/// Tutor operational states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorState {
    /// Waiting for input
    Idle,
    /// A lookup is in flight
    Fetching,
    /// Shutting down
    ShuttingDown,
}

impl TutorState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Fetching => "Thinking...",
            Self::ShuttingDown => "Shutting down...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_seq_ordering() {
        let first = LookupSeq::default().next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second, LookupSeq(2));
    }

    #[test]
    fn test_tutor_state_description() {
        assert_eq!(TutorState::Idle.description(), "Ready");
        assert_eq!(TutorState::Fetching.description(), "Thinking...");
    }
}
