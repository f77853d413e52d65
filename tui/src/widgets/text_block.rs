//! TextBlock Widget
//!
//! A borderless block of wrapped text. Wrapping goes through `textwrap`, which
//! measures CJK text by display width.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use textwrap::wrap;

/// A borderless, wrapped text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
}

impl<'a> TextBlock<'a> {
    /// Block showing `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
        }
    }

    /// Text style
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Content wrapped to `width` columns
    pub fn lines(&self, width: u16) -> Vec<String> {
        if width == 0 {
            return Vec::new();
        }
        self.content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, usize::from(width))
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect()
    }

    /// Rows needed at `width` columns
    pub fn height(&self, width: u16) -> u16 {
        u16::try_from(self.lines(width).len()).unwrap_or(u16::MAX)
    }
}

impl Widget for TextBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (i, line) in self
            .lines(area.width)
            .iter()
            .take(usize::from(area.height))
            .enumerate()
        {
            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, usize::from(area.width), self.style);
        }
    }
}
