//! Widgets
//!
//! Custom ratatui widgets for bihua.

pub mod board;
pub mod button;
pub mod panel;
pub mod text_block;

pub use board::{BoardColors, BoardRaster, BoardTransform, BoardWidget};
pub use button::Button;
pub use panel::DetailPanel;
pub use text_block::TextBlock;
