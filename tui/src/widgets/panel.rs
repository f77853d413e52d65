//! Detail Panel Widget
//!
//! Renders a [`PanelView`]: a placeholder while loading or empty, otherwise
//! the character with its pinyin, definition and example sentence. The
//! bottom rows are left free for the two audio buttons.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use tutor_core::panel::PANEL_TITLE;
use tutor_core::{CharacterRecord, PanelView};

use super::text_block::TextBlock;
use crate::theme::{DIM_GRAY, EMERALD, EXAMPLE_AMBER, TEXT_SLATE};

/// Rows kept free at the bottom for the audio buttons
pub const BUTTON_ROWS: u16 = 3;

/// The detail panel
pub struct DetailPanel<'a> {
    view: PanelView<'a>,
}

impl<'a> DetailPanel<'a> {
    /// Panel showing `view`
    pub fn new(view: PanelView<'a>) -> Self {
        Self { view }
    }
}

impl Widget for DetailPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(EMERALD))
            .title(Span::styled(
                format!(" {PANEL_TITLE} "),
                Style::default().fg(EMERALD).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let content = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(BUTTON_ROWS),
        );
        if content.width == 0 || content.height == 0 {
            return;
        }

        match self.view {
            PanelView::Populated(record) => render_record(record, content, buf),
            view => {
                let text = view.placeholder().unwrap_or_default();
                let middle = Rect::new(content.x, content.y + content.height / 2, content.width, 1);
                Paragraph::new(Span::styled(text, Style::default().fg(DIM_GRAY)))
                    .alignment(Alignment::Center)
                    .render(middle, buf);
            }
        }
    }
}

/// Lay out the record top to bottom, stopping when space runs out
fn render_record(record: &CharacterRecord, area: Rect, buf: &mut Buffer) {
    let label = Style::default().fg(DIM_GRAY);
    let body = Style::default().fg(TEXT_SLATE);

    let mut y = area.y;
    let bottom = area.y + area.height;
    let mut next = |height: u16| -> Option<Rect> {
        if y >= bottom {
            return None;
        }
        let rect = Rect::new(area.x, y, area.width, height.min(bottom - y));
        y = y.saturating_add(height);
        Some(rect)
    };

    if let Some(rect) = next(2) {
        Paragraph::new(Line::from(vec![
            Span::styled(
                record.char.clone(),
                Style::default().fg(TEXT_SLATE).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("拼音 ", label),
            Span::styled(
                record.pinyin.clone(),
                Style::default().fg(EMERALD).add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(rect, buf);
    }

    if let Some(rect) = next(1) {
        Paragraph::new(Span::styled("释义", label)).render(rect, buf);
    }
    let definition = TextBlock::new(&record.definition).style(body);
    let height = definition.height(area.width);
    if let Some(rect) = next(height + 1) {
        definition.render(rect, buf);
    }

    if let Some(rect) = next(1) {
        Paragraph::new(Span::styled(
            "例句",
            Style::default().fg(EXAMPLE_AMBER).add_modifier(Modifier::BOLD),
        ))
        .render(rect, buf);
    }
    let quoted = format!("\"{}\"", record.example);
    let example = TextBlock::new(&quoted).style(body.add_modifier(Modifier::BOLD));
    let height = example.height(area.width);
    if let Some(rect) = next(height) {
        example.render(rect, buf);
    }
    let translation = TextBlock::new(&record.example_translation)
        .style(Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC));
    let height = translation.height(area.width);
    if let Some(rect) = next(height) {
        translation.render(rect, buf);
    }
}
