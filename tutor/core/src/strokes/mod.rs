//! Stroke Board
//!
//! Everything needed to show how a character is written: stroke data and
//! geometry, where the data comes from, animation timing, the quiz matcher
//! and the board that ties them together.

mod animation;
mod board;
mod data;
mod quiz;
mod source;

pub use animation::StrokeAnimation;
pub use board::{
    BoardConfig, BoardEvent, BoardFrame, BoardHandle, FrameStroke, QuizStatus, StrokeBoard,
};
pub use data::{flatten_svg_path, polyline_length, CharacterStrokes, Point, StrokeGeometry, DATA_SIZE};
pub use quiz::{stroke_matches, Quiz, QuizOutcome};
pub use source::{CdnStrokeSource, StrokeError, StrokeSource, DEFAULT_STROKE_CDN};
