//! bihua TUI - Terminal interface for the stroke-order tutor
//!
//! This crate provides a full-screen terminal UI over `tutor-core`: a braille
//! stroke board, the character detail panel, and a one-glyph input field.
//!
//! # Architecture
//!
//! - **TutorClient**: Embeds the Tutor in-process
//! - **DisplayState**: Rendering state derived from TutorMessages
//! - **Layout**: Screen regions and mouse hit testing
//! - **Widgets**: Board canvas, detail panel, buttons, wrapped text

pub mod app;
pub mod display;
pub mod input;
pub mod layout;
pub mod theme;
pub mod tutor_client;
pub mod widgets;

pub use app::App;
pub use tutor_client::TutorClient;
