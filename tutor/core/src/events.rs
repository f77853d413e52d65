//! Surface Events
//!
//! Events sent from UI surfaces to the Tutor. Surfaces only report what the
//! learner did; the Tutor decides what it means.

use serde::{Deserialize, Serialize};

use crate::panel::SpeakTarget;
use crate::strokes::Point;

/// Events from UI surface to Tutor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Surface connected to the Tutor
    Connected {
        /// Surface type identifier
        surface_type: SurfaceType,
    },

    /// The learner submitted the input field
    ///
    /// Sent for both the Enter key and the submit control, carrying the
    /// field's current value untouched.
    Submit {
        /// Raw field contents
        input: String,
    },

    /// Replay the stroke animation
    Animate,

    /// Enter quiz (tracing) mode
    Quiz,

    /// The drawable surface was clicked outside quiz mode
    BoardClicked,

    /// A stroke was drawn on the board in quiz mode
    QuizStroke {
        /// Drawn points in normalized board space
        points: Vec<Point>,
    },

    /// Read part of the current record aloud
    Speak {
        /// What to read
        target: SpeakTarget,
    },

    /// The learner asked to quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Submit { .. } => "submit",
            Self::Animate => "animate",
            Self::Quiz => "quiz",
            Self::BoardClicked => "board_clicked",
            Self::QuizStroke { .. } => "quiz_stroke",
            Self::Speak { .. } => "speak",
            Self::QuitRequested => "quit_requested",
        }
    }
}

/// Type of UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Terminal UI (ratatui/crossterm)
    Tui,
    /// Headless (for testing/automation)
    Headless,
}

impl SurfaceType {
    /// Human-readable name
    pub fn name(&self) -> &str {
        match self {
            Self::Tui => "Terminal",
            Self::Headless => "Headless",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_type_name() {
        assert_eq!(SurfaceType::Tui.name(), "Terminal");
        assert_eq!(SurfaceType::Headless.name(), "Headless");
    }

    #[test]
    fn test_event_kind() {
        let submit = SurfaceEvent::Submit {
            input: "猫".to_string(),
        };
        assert_eq!(submit.kind(), "submit");
        assert_eq!(SurfaceEvent::Animate.kind(), "animate");
    }
}
