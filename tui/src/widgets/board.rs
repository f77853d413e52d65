//! Board Widget
//!
//! Draws a [`BoardFrame`] onto a braille canvas: a dashed rice grid, the
//! character outline, revealed stroke fills, the quiz hint and the stroke the
//! learner is dragging.
//!
//! Stroke fills are rasterized once per glyph and canvas size into
//! [`BoardRaster`]. Each dot remembers how far along its stroke's median it
//! lies, so a frame only has to compare that against the stroke's reveal
//! fraction.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Context, Line, Points};
use ratatui::widgets::{Block, BorderType, Borders, StatefulWidget, Widget};

use tutor_core::{BoardConfig, BoardFrame, Glyph, Point, QuizOutcome, StrokeGeometry};

use crate::display::BoardStatus;
use crate::theme::{
    color_or, DIM_GRAY, DRAW_AMBER, ERROR_RED, GRID_RED, HINT_BLUE, OUTLINE_GRAY,
    RADICAL_EMERALD, STROKE_SLATE, SUCCESS_GREEN,
};

/// Loading overlay text
pub const LOADING_TEXT: &str = "加载中...";

/// Tag shown while previewing the animation
pub const PREVIEW_TAG: &str = "预览模式";

/// Tag prefix shown in quiz mode
pub const QUIZ_TAG: &str = "描红模式";

/// Dash length along the grid lines, in canvas units
const DASH: f64 = 0.02;

/// Maps between glyph space and canvas space (both 0..1, y down)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardTransform {
    padding: f64,
}

impl BoardTransform {
    /// Transform with `padding` (fraction of the board) on every side
    pub fn new(padding: f64) -> Self {
        Self {
            padding: padding.clamp(0.0, 0.45),
        }
    }

    /// Glyph point to canvas coordinates
    pub fn to_canvas(self, p: Point) -> (f64, f64) {
        let scale = 1.0 - 2.0 * self.padding;
        (self.padding + p.x * scale, self.padding + p.y * scale)
    }

    /// Canvas coordinates to a glyph point
    pub fn to_glyph(self, x: f64, y: f64) -> Point {
        let scale = 1.0 - 2.0 * self.padding;
        Point::new((x - self.padding) / scale, (y - self.padding) / scale)
    }
}

/// Stroke colors resolved from the board configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardColors {
    /// Radical strokes
    pub radical: Color,
    /// Every other stroke
    pub stroke: Color,
}

impl BoardColors {
    /// Parse the configured colors, warning about (and replacing) bad ones
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            radical: color_or(&config.radical_color, RADICAL_EMERALD),
            stroke: color_or(&config.stroke_color, STROKE_SLATE),
        }
    }
}

/// One braille dot inside a stroke
#[derive(Clone, Copy, Debug, PartialEq)]
struct Dot {
    x: f64,
    y: f64,
    progress: f32,
}

/// Rasterized stroke fills for one glyph at one canvas size
#[derive(Debug, Default)]
pub struct BoardRaster {
    key: Option<(Glyph, u16, u16, u64)>,
    strokes: Vec<Vec<Dot>>,
}

impl BoardRaster {
    /// Empty raster
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the raster if the glyph, canvas size or padding changed
    fn prepare(&mut self, frame: &BoardFrame<'_>, canvas: Rect, transform: BoardTransform) {
        let key = (
            frame.glyph,
            canvas.width,
            canvas.height,
            transform.padding.to_bits(),
        );
        if self.key == Some(key) && self.strokes.len() == frame.strokes.len() {
            return;
        }

        let cols = u32::from(canvas.width) * 2;
        let rows = u32::from(canvas.height) * 4;
        self.strokes = frame
            .strokes
            .iter()
            .map(|s| rasterize(s.geometry, cols, rows, transform))
            .collect();
        self.key = Some(key);

        tracing::debug!(
            glyph = %frame.glyph,
            strokes = self.strokes.len(),
            dots = self.strokes.iter().map(Vec::len).sum::<usize>(),
            "Rasterized board"
        );
    }
}

/// The stroke board
pub struct BoardWidget<'a> {
    frame: Option<&'a BoardFrame<'a>>,
    status: &'a BoardStatus,
    config: &'a BoardConfig,
    colors: BoardColors,
    drag: &'a [(f64, f64)],
}

impl<'a> BoardWidget<'a> {
    /// Board showing `frame` (if loaded) in `status`
    pub fn new(
        frame: Option<&'a BoardFrame<'a>>,
        status: &'a BoardStatus,
        config: &'a BoardConfig,
        colors: BoardColors,
    ) -> Self {
        Self {
            frame,
            status,
            config,
            colors,
            drag: &[],
        }
    }

    /// Stroke being dragged, in canvas coordinates
    pub fn drag(mut self, drag: &'a [(f64, f64)]) -> Self {
        self.drag = drag;
        self
    }

    fn tag(&self) -> String {
        match self.frame.and_then(|f| f.quiz) {
            Some(quiz) => format!(" {QUIZ_TAG} {}/{} ", quiz.completed, quiz.total),
            None => format!(" {PREVIEW_TAG} "),
        }
    }

    fn feedback(&self) -> Option<TextLine<'static>> {
        let outcome = self.frame.and_then(|f| f.quiz)?.last_outcome?;
        let line = match outcome {
            QuizOutcome::Correct { .. } => {
                TextLine::styled(" ✓ ", Style::default().fg(SUCCESS_GREEN))
            }
            QuizOutcome::Miss { misses, .. } => {
                TextLine::styled(format!(" ✗ {misses} "), Style::default().fg(ERROR_RED))
            }
            QuizOutcome::Complete { total_misses } => TextLine::styled(
                format!(" 完成! 错 {total_misses} 次 "),
                Style::default().fg(SUCCESS_GREEN),
            ),
        };
        Some(line.right_aligned())
    }
}

impl StatefulWidget for BoardWidget<'_> {
    type State = BoardRaster;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(DIM_GRAY))
            .title(TextLine::styled(self.tag(), Style::default().fg(DIM_GRAY)));
        if let Some(feedback) = self.feedback() {
            block = block.title(feedback);
        }

        let canvas_area = block.inner(area);
        if canvas_area.width < 2 || canvas_area.height < 2 {
            block.render(area, buf);
            return;
        }

        let transform = BoardTransform::new(self.config.padding_fraction());
        if let Some(frame) = self.frame {
            state.prepare(frame, canvas_area, transform);
        }

        let BoardColors { radical, stroke } = self.colors;

        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([0.0, 1.0])
            .y_bounds([0.0, 1.0])
            .paint(|ctx| {
                draw_grid(ctx);
                ctx.layer();

                if let Some(frame) = self.frame {
                    draw_strokes(ctx, frame, &state.strokes, radical, stroke);
                }
                draw_drag(ctx, self.drag);

                match self.status {
                    BoardStatus::Loading(_) => {
                        ctx.print(
                            0.42,
                            0.5,
                            TextLine::styled(LOADING_TEXT, Style::default().fg(DIM_GRAY)),
                        );
                    }
                    BoardStatus::Failed { glyph, .. } if self.frame.is_none() => {
                        ctx.print(
                            0.3,
                            0.5,
                            TextLine::styled(
                                format!("无法加载 {glyph} 的笔画"),
                                Style::default().fg(ERROR_RED),
                            ),
                        );
                    }
                    _ => {}
                }
            })
            .render(area, buf);
    }
}

/// Canvas y points up; board space points down
fn flip(y: f64) -> f64 {
    1.0 - y
}

/// Dashed rice grid: both center lines and both diagonals
fn draw_grid(ctx: &mut Context<'_>) {
    let mut coords = Vec::new();
    let steps = (1.0 / DASH) as usize;
    for i in (0..steps).filter(|i| i % 2 == 0) {
        let t = i as f64 * DASH;
        coords.push((0.5, t));
        coords.push((t, 0.5));
        coords.push((t, t));
        coords.push((t, 1.0 - t));
    }
    ctx.draw(&Points {
        coords: &coords,
        color: GRID_RED,
    });
}

fn draw_strokes(
    ctx: &mut Context<'_>,
    frame: &BoardFrame<'_>,
    raster: &[Vec<Dot>],
    radical: Color,
    stroke: Color,
) {
    let hinted = frame.quiz.and_then(|q| q.hinted);

    if frame.show_outline {
        let hidden: Vec<(f64, f64)> = frame
            .strokes
            .iter()
            .zip(raster)
            .enumerate()
            .filter(|(i, _)| Some(*i) != hinted)
            .flat_map(|(_, (s, dots))| {
                dots.iter()
                    .filter(move |d| !is_revealed(d, s.reveal))
                    .map(|d| (d.x, flip(d.y)))
            })
            .collect();
        ctx.draw(&Points {
            coords: &hidden,
            color: OUTLINE_GRAY,
        });
        ctx.layer();
    }

    if let Some(index) = hinted {
        if let Some(dots) = raster.get(index) {
            let coords: Vec<(f64, f64)> = dots.iter().map(|d| (d.x, flip(d.y))).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: HINT_BLUE,
            });
            ctx.layer();
        }
    }

    for (s, dots) in frame.strokes.iter().zip(raster) {
        let coords: Vec<(f64, f64)> = dots
            .iter()
            .filter(|d| is_revealed(d, s.reveal))
            .map(|d| (d.x, flip(d.y)))
            .collect();
        if coords.is_empty() {
            continue;
        }
        ctx.draw(&Points {
            coords: &coords,
            color: if s.geometry.is_radical { radical } else { stroke },
        });
    }
    ctx.layer();
}

fn draw_drag(ctx: &mut Context<'_>, drag: &[(f64, f64)]) {
    for pair in drag.windows(2) {
        ctx.draw(&Line::new(
            pair[0].0,
            flip(pair[0].1),
            pair[1].0,
            flip(pair[1].1),
            DRAW_AMBER,
        ));
    }
}

fn is_revealed(dot: &Dot, reveal: f32) -> bool {
    reveal >= 1.0 || (reveal > 0.0 && dot.progress <= reveal)
}

/// Every dot center of a `cols` x `rows` grid that falls inside the stroke
fn rasterize(geometry: &StrokeGeometry, cols: u32, rows: u32, transform: BoardTransform) -> Vec<Dot> {
    let Some((min, max)) = bounds(&geometry.outline) else {
        return Vec::new();
    };

    let mut dots = Vec::new();
    for row in 0..rows {
        let y = (f64::from(row) + 0.5) / f64::from(rows);
        for col in 0..cols {
            let x = (f64::from(col) + 0.5) / f64::from(cols);
            let p = transform.to_glyph(x, y);
            if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
                continue;
            }
            if contains(&geometry.outline, p) {
                dots.push(Dot {
                    x,
                    y,
                    progress: median_progress(&geometry.median, p),
                });
            }
        }
    }
    dots
}

fn bounds(points: &[Point]) -> Option<(Point, Point)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

/// Even-odd point in polygon
fn contains(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Fraction of the median length at the point closest to `p`
fn median_progress(median: &[Point], p: Point) -> f32 {
    if median.len() < 2 {
        return 0.0;
    }

    let total: f64 = median.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut walked = 0.0;
    let mut best = (f64::INFINITY, 0.0);
    for w in median.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg = a.distance(b);
        let t = if seg > 0.0 {
            (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / (seg * seg)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        let d = closest.distance(p);
        if d < best.0 {
            best = (d, walked + seg * t);
        }
        walked += seg;
    }

    (best.1 / total) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_stroke() -> StrokeGeometry {
        StrokeGeometry {
            outline: vec![
                Point::new(0.2, 0.4),
                Point::new(0.8, 0.4),
                Point::new(0.8, 0.6),
                Point::new(0.2, 0.6),
            ],
            median: vec![Point::new(0.2, 0.5), Point::new(0.8, 0.5)],
            median_length: 614.4,
            is_radical: false,
        }
    }

    #[test]
    fn test_transform_round_trips_padding() {
        let t = BoardTransform::new(0.1);
        assert_eq!(t.to_canvas(Point::new(0.0, 0.0)), (0.1, 0.1));
        let (x, y) = t.to_canvas(Point::new(1.0, 1.0));
        assert!((x - 0.9).abs() < 1e-9 && (y - 0.9).abs() < 1e-9);

        let p = t.to_glyph(0.5, 0.5);
        assert!((p.x - 0.5).abs() < 1e-9 && (p.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_contains() {
        let s = square_stroke();
        assert!(contains(&s.outline, Point::new(0.5, 0.5)));
        assert!(!contains(&s.outline, Point::new(0.5, 0.7)));
        assert!(!contains(&s.outline, Point::new(0.1, 0.5)));
    }

    #[test]
    fn test_median_progress() {
        let s = square_stroke();
        assert!(median_progress(&s.median, Point::new(0.2, 0.45)) < 0.01);
        assert!((median_progress(&s.median, Point::new(0.5, 0.55)) - 0.5).abs() < 0.01);
        assert!(median_progress(&s.median, Point::new(0.8, 0.5)) > 0.99);
    }

    #[test]
    fn test_rasterize_fills_only_the_stroke() {
        let dots = rasterize(&square_stroke(), 40, 40, BoardTransform::new(0.0));
        assert!(!dots.is_empty());
        assert!(dots.iter().all(|d| d.x > 0.2 && d.x < 0.8 && d.y > 0.4 && d.y < 0.6));
        // 24 columns x 8 rows of dot centers
        assert_eq!(dots.len(), 192);
    }

    #[test]
    fn test_reveal_threshold() {
        let dot = Dot {
            x: 0.5,
            y: 0.5,
            progress: 0.5,
        };
        assert!(!is_revealed(&dot, 0.0));
        assert!(!is_revealed(&dot, 0.4));
        assert!(is_revealed(&dot, 0.6));
        assert!(is_revealed(&Dot { progress: 1.0, ..dot }, 1.0));
        assert!(!is_revealed(&Dot { progress: 0.0, ..dot }, 0.0));
    }

    #[test]
    fn test_board_colors_from_config() {
        let colors = BoardColors::from_config(&BoardConfig::default());
        assert_eq!(colors.radical, RADICAL_EMERALD);
        assert_eq!(colors.stroke, STROKE_SLATE);

        let config = BoardConfig {
            stroke_color: "slate".to_string(),
            ..BoardConfig::default()
        };
        assert_eq!(BoardColors::from_config(&config).stroke, STROKE_SLATE);
    }
}
