//! Button Widget
//!
//! A rounded, bordered label with an optional key hint. Buttons are
//! clicked through [`crate::layout::AppLayout::hit`]; this widget only draws.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::theme::DIM_GRAY;

/// Spinner frames shown on a busy button
const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// A clickable button
pub struct Button<'a> {
    label: &'a str,
    hint: Option<&'a str>,
    color: Color,
    busy: Option<usize>,
}

impl<'a> Button<'a> {
    /// Button labelled `label`, drawn in `color`
    pub fn new(label: &'a str, color: Color) -> Self {
        Self {
            label,
            hint: None,
            color,
            busy: None,
        }
    }

    /// Key that activates the button
    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Show a spinner (at animation `tick`) in front of the label
    pub fn busy(mut self, tick: Option<usize>) -> Self {
        self.busy = tick;
        self
    }
}

impl Widget for Button<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.color));

        let mut spans = Vec::new();
        if let Some(tick) = self.busy {
            spans.push(Span::styled(
                format!("{} ", SPINNER[tick % SPINNER.len()]),
                Style::default().fg(self.color),
            ));
        }
        spans.push(Span::styled(
            self.label,
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        ));
        if let Some(hint) = self.hint {
            spans.push(Span::styled(format!(" {hint}"), Style::default().fg(DIM_GRAY)));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_renders_label_and_hint() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 24, 3));
        Button::new("Replay", Color::Blue)
            .hint("F2")
            .render(buf.area, &mut buf);
        let middle = row(&buf, 1);
        assert!(middle.contains("Replay"));
        assert!(middle.contains("F2"));
        assert!(row(&buf, 0).starts_with('╭'));
    }

    #[test]
    fn test_busy_spinner() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 24, 3));
        Button::new("Go", Color::Green)
            .busy(Some(1))
            .render(buf.area, &mut buf);
        assert!(row(&buf, 1).contains('⠙'));
    }
}
