//! Screen Layout
//!
//! Splits the terminal into the header, input row, board column, detail
//! panel and status bar, and maps mouse positions back to the control under
//! the pointer.
//!
//! ```text
//! ┌──────────────────────── header ────────────────────────┐
//! │           [ input field        ] [ 生成笔画 ]           │
//! │ ┌───── board ─────┐         ┌──── detail panel ─────┐  │
//! │ │                 │         │                       │  │
//! │ └─────────────────┘         │                       │  │
//! │   ready line                │ [读字 F5] [读例句 F6] │  │
//! │ [演示笔画] [开始描红]       └───────────────────────┘  │
//! └──────────────────────── status ────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Layout, Position, Rect};

/// Header height (title, subtitle, spacer)
const HEADER_HEIGHT: u16 = 3;

/// Input row height (bordered single line)
const INPUT_HEIGHT: u16 = 3;

/// Button row height
const BUTTON_HEIGHT: u16 = 3;

/// Width of the input row
const INPUT_ROW_WIDTH: u16 = 56;

/// Width of the submit button
const SUBMIT_WIDTH: u16 = 14;

/// Something the mouse can land on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// The input field
    Input,
    /// The submit button
    Submit,
    /// The drawing canvas
    Board,
    /// The replay button
    Animate,
    /// The quiz button
    Quiz,
    /// Read the character aloud
    SpeakCharacter,
    /// Read the example aloud
    SpeakExample,
}

impl HitTarget {
    fn is_audio(self) -> bool {
        matches!(self, Self::SpeakCharacter | Self::SpeakExample)
    }
}

/// Screen regions for one terminal size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppLayout {
    /// Title and subtitle
    pub header: Rect,
    /// Input field (with border)
    pub input: Rect,
    /// Submit button
    pub submit: Rect,
    /// Board frame (with border)
    pub board: Rect,
    /// Drawing surface inside the board frame
    pub canvas: Rect,
    /// Line under the board
    pub ready_line: Rect,
    /// Replay button
    pub animate: Rect,
    /// Quiz button
    pub quiz: Rect,
    /// Detail panel (with border)
    pub panel: Rect,
    /// Speak-character button
    pub speak_character: Rect,
    /// Speak-example button
    pub speak_example: Rect,
    /// Status bar
    pub status: Rect,
}

impl AppLayout {
    /// Compute the layout for a terminal area
    pub fn compute(area: Rect) -> Self {
        let [header, input_row, body, status] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let input_row = centered(input_row, INPUT_ROW_WIDTH.min(input_row.width));
        let [input, submit] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(SUBMIT_WIDTH)])
                .areas(input_row);

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body);

        let [board_area, ready_line, board_buttons] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(BUTTON_HEIGHT),
        ])
        .areas(left);

        let board = square_board(board_area);
        let canvas = inner(board);

        let buttons = centered(board_buttons, board.width.max(30).min(board_buttons.width));
        let [animate, quiz] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(buttons);

        let panel = right;
        let panel_inner = inner(panel);
        let speak_row = Rect::new(
            panel_inner.x,
            (panel_inner.y + panel_inner.height).saturating_sub(BUTTON_HEIGHT),
            panel_inner.width,
            BUTTON_HEIGHT.min(panel_inner.height),
        );
        let [speak_character, speak_example] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(speak_row);

        Self {
            header,
            input,
            submit,
            board,
            canvas,
            ready_line,
            animate,
            quiz,
            panel,
            speak_character,
            speak_example,
            status,
        }
    }

    /// The control at a terminal cell, if any
    ///
    /// The audio buttons only exist while `audio` is set (the panel shows a
    /// record).
    pub fn hit(&self, column: u16, row: u16, audio: bool) -> Option<HitTarget> {
        let pos = Position::new(column, row);
        [
            (self.submit, HitTarget::Submit),
            (self.input, HitTarget::Input),
            (self.canvas, HitTarget::Board),
            (self.animate, HitTarget::Animate),
            (self.quiz, HitTarget::Quiz),
            (self.speak_character, HitTarget::SpeakCharacter),
            (self.speak_example, HitTarget::SpeakExample),
        ]
        .into_iter()
        .filter(|(_, target)| audio || !target.is_audio())
        .find(|(rect, _)| rect.contains(pos))
        .map(|(_, target)| target)
    }

    /// Map a terminal cell on the canvas to canvas space (0..1, y down)
    pub fn canvas_point(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        if !self.canvas.contains(Position::new(column, row)) {
            return None;
        }
        let x = (f64::from(column - self.canvas.x) + 0.5) / f64::from(self.canvas.width);
        let y = (f64::from(row - self.canvas.y) + 0.5) / f64::from(self.canvas.height);
        Some((x, y))
    }
}

/// Horizontally center a region of `width` inside `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}

/// Area inside a one-cell border
fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// The largest visually square board that fits (cells are about twice as tall as wide)
fn square_board(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> AppLayout {
        AppLayout::compute(Rect::new(0, 0, 120, 40))
    }

    #[test]
    fn test_regions_fit_terminal() {
        let area = Rect::new(0, 0, 120, 40);
        let l = layout();
        for rect in [l.header, l.input, l.submit, l.board, l.panel, l.status] {
            assert!(area.contains(Position::new(rect.x, rect.y)));
            assert!(rect.right() <= area.right());
            assert!(rect.bottom() <= area.bottom());
        }
        assert_eq!(l.status.y, 39);
    }

    #[test]
    fn test_board_is_visually_square() {
        let l = layout();
        assert_eq!(l.board.width, l.board.height * 2);
        assert!(l.board.height > 10);
    }

    #[test]
    fn test_hit_targets() {
        let l = layout();
        assert_eq!(l.hit(l.submit.x + 1, l.submit.y + 1, true), Some(HitTarget::Submit));
        assert_eq!(l.hit(l.input.x + 1, l.input.y + 1, true), Some(HitTarget::Input));
        assert_eq!(l.hit(l.canvas.x, l.canvas.y, true), Some(HitTarget::Board));
        assert_eq!(l.hit(l.animate.x, l.animate.y, true), Some(HitTarget::Animate));
        assert_eq!(l.hit(l.quiz.x, l.quiz.y, true), Some(HitTarget::Quiz));
        assert_eq!(
            l.hit(l.speak_example.x, l.speak_example.y, true),
            Some(HitTarget::SpeakExample)
        );
        assert_eq!(l.hit(0, 0, true), None);
    }

    #[test]
    fn test_audio_buttons_absent_without_record() {
        let l = layout();
        assert_eq!(l.hit(l.speak_character.x, l.speak_character.y, false), None);
        assert_eq!(l.hit(l.speak_example.x, l.speak_example.y, false), None);
        assert_eq!(l.hit(l.quiz.x, l.quiz.y, false), Some(HitTarget::Quiz));
    }

    #[test]
    fn test_canvas_point() {
        let l = layout();
        let (x, y) = l.canvas_point(l.canvas.x, l.canvas.y).unwrap();
        assert!(x > 0.0 && x < 0.1);
        assert!(y > 0.0 && y < 0.1);
        assert!(l.canvas_point(l.board.x, l.board.y).is_none());
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let l = AppLayout::compute(Rect::new(0, 0, 10, 5));
        assert!(l.board.width <= 10);
        let _ = l.hit(3, 3, true);
    }
}
