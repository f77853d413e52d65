//! Theme and Colors
//!
//! bihua's palette: emerald for the radical and primary actions, slate for
//! strokes and body text, amber for the example sentence, blue for playback.

use ratatui::style::Color;

// ============================================================================
// Board Palette
// ============================================================================

/// Radical strokes - emerald
pub const RADICAL_EMERALD: Color = Color::Rgb(16, 185, 129);

/// Other strokes - slate
pub const STROKE_SLATE: Color = Color::Rgb(51, 65, 85);

/// Character outline - light slate
pub const OUTLINE_GRAY: Color = Color::Rgb(203, 213, 225);

/// Rice-grid guide lines - soft red
pub const GRID_RED: Color = Color::Rgb(254, 202, 202);

/// Hinted stroke in quiz mode
pub const HINT_BLUE: Color = Color::Rgb(96, 165, 250);

/// Stroke being drawn by the learner
pub const DRAW_AMBER: Color = Color::Rgb(245, 158, 11);

// ============================================================================
// UI Colors
// ============================================================================

/// Primary action / panel accent
pub const EMERALD: Color = Color::Rgb(16, 185, 129);

/// Playback button
pub const PLAY_BLUE: Color = Color::Rgb(59, 130, 246);

/// Example sentence accent
pub const EXAMPLE_AMBER: Color = Color::Rgb(180, 83, 9);

/// Body text
pub const TEXT_SLATE: Color = Color::Rgb(226, 232, 240);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 116, 139);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(248, 113, 113);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(52, 211, 153);

/// Warning yellow
pub const WARNING_YELLOW: Color = Color::Rgb(250, 204, 21);

// ============================================================================
// Configurable colors
// ============================================================================

/// Parse a configured color (`#rrggbb` or a color name), falling back
/// with a warning
pub fn color_or(s: &str, fallback: Color) -> Color {
    s.trim().parse::<Color>().unwrap_or_else(|e| {
        tracing::warn!(color = s, error = %e, "Using default color");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_or_parses_config_values() {
        assert_eq!(color_or("#10b981", HINT_BLUE), RADICAL_EMERALD);
        assert_eq!(color_or(" #334155 ", HINT_BLUE), STROKE_SLATE);
        assert_eq!(color_or("red", HINT_BLUE), Color::Red);
    }

    #[test]
    fn test_color_or_falls_back() {
        assert_eq!(color_or("nope", HINT_BLUE), HINT_BLUE);
        assert_eq!(color_or("#12345", HINT_BLUE), HINT_BLUE);
        assert_eq!(color_or("#gggggg", HINT_BLUE), HINT_BLUE);
    }
}
