//! Stroke Quiz
//!
//! In quiz mode the learner draws each stroke in order. A drawn stroke is
//! accepted when it starts and ends near the expected median, stays close to
//! it on average, points the same way and is not much shorter.

use serde::{Deserialize, Serialize};

use super::data::{polyline_length, Point, StrokeGeometry, DATA_SIZE};

/// Maximum distance between drawn and expected endpoints, in data units
const ENDPOINT_TOLERANCE: f64 = 250.0;

/// Maximum mean distance from the expected median, in data units
const AVERAGE_DISTANCE_TOLERANCE: f64 = 350.0;

/// Minimum drawn length relative to the expected median
const MIN_LENGTH_RATIO: f64 = 0.35;

/// Result of submitting one drawn stroke
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    /// The stroke matched
    Correct {
        /// Index of the accepted stroke
        stroke: usize,
    },
    /// The stroke did not match
    Miss {
        /// Index of the expected stroke
        stroke: usize,
        /// Consecutive misses on this stroke
        misses: u32,
    },
    /// The last stroke matched; the character is done
    Complete {
        /// Misses over the whole character
        total_misses: u32,
    },
}

/// Progress through one quiz
#[derive(Clone, Debug)]
pub struct Quiz {
    /// Number of strokes in the character
    stroke_count: usize,
    /// Next stroke to draw
    current: usize,
    /// Consecutive misses on the current stroke
    misses_on_current: u32,
    /// Misses over the whole quiz
    total_misses: u32,
    /// Misses before the expected stroke is hinted
    hint_after: u32,
}

impl Quiz {
    /// Start a quiz over `stroke_count` strokes
    #[must_use]
    pub fn new(stroke_count: usize, hint_after: u32) -> Self {
        Self {
            stroke_count,
            current: 0,
            misses_on_current: 0,
            total_misses: 0,
            hint_after,
        }
    }

    /// Strokes accepted so far
    #[must_use]
    pub fn completed_strokes(&self) -> usize {
        self.current
    }

    /// Whether every stroke has been drawn
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.stroke_count
    }

    /// Stroke that should be hinted, if the learner is stuck
    #[must_use]
    pub fn hinted_stroke(&self) -> Option<usize> {
        (!self.is_complete() && self.hint_after > 0 && self.misses_on_current >= self.hint_after)
            .then_some(self.current)
    }

    /// Check a drawn stroke against the expected one
    ///
    /// Returns `None` once the quiz is already complete.
    pub fn submit(&mut self, drawn: &[Point], strokes: &[StrokeGeometry]) -> Option<QuizOutcome> {
        if self.is_complete() {
            return None;
        }
        let expected = strokes.get(self.current)?;

        if stroke_matches(drawn, &expected.median) {
            let stroke = self.current;
            self.current += 1;
            self.misses_on_current = 0;
            if self.is_complete() {
                Some(QuizOutcome::Complete {
                    total_misses: self.total_misses,
                })
            } else {
                Some(QuizOutcome::Correct { stroke })
            }
        } else {
            self.misses_on_current += 1;
            self.total_misses += 1;
            Some(QuizOutcome::Miss {
                stroke: self.current,
                misses: self.misses_on_current,
            })
        }
    }
}

/// Whether a drawn polyline matches an expected median (both normalized)
#[must_use]
pub fn stroke_matches(drawn: &[Point], median: &[Point]) -> bool {
    let (Some(&d_start), Some(&d_end)) = (drawn.first(), drawn.last()) else {
        return false;
    };
    let (Some(&m_start), Some(&m_end)) = (median.first(), median.last()) else {
        return false;
    };
    if drawn.len() < 2 {
        return false;
    }

    if d_start.distance(m_start) * DATA_SIZE > ENDPOINT_TOLERANCE
        || d_end.distance(m_end) * DATA_SIZE > ENDPOINT_TOLERANCE
    {
        return false;
    }

    let average = drawn
        .iter()
        .map(|p| distance_to_polyline(*p, median))
        .sum::<f64>()
        / drawn.len() as f64;
    if average * DATA_SIZE > AVERAGE_DISTANCE_TOLERANCE {
        return false;
    }

    let (dx, dy) = (d_end.x - d_start.x, d_end.y - d_start.y);
    let (mx, my) = (m_end.x - m_start.x, m_end.y - m_start.y);
    if dx * mx + dy * my <= 0.0 {
        return false;
    }

    let expected_len = polyline_length(median);
    expected_len <= 0.0 || polyline_length(drawn) / expected_len >= MIN_LENGTH_RATIO
}

fn distance_to_polyline(p: Point, line: &[Point]) -> f64 {
    match line {
        [] => f64::INFINITY,
        [only] => p.distance(*only),
        _ => line
            .windows(2)
            .map(|seg| distance_to_segment(p, seg[0], seg[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + abx * t, a.y + aby * t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal() -> StrokeGeometry {
        StrokeGeometry {
            outline: vec![],
            median: vec![Point::new(0.1, 0.5), Point::new(0.9, 0.5)],
            median_length: 0.8 * DATA_SIZE,
            is_radical: false,
        }
    }

    fn vertical() -> StrokeGeometry {
        StrokeGeometry {
            outline: vec![],
            median: vec![Point::new(0.5, 0.1), Point::new(0.5, 0.9)],
            median_length: 0.8 * DATA_SIZE,
            is_radical: false,
        }
    }

    fn drawn(points: &[(f64, f64)]) -> Vec<Point> {
        points.iter().map(|(x, y)| Point::new(*x, *y)).collect()
    }

    #[test]
    fn test_matching_stroke() {
        let line = drawn(&[(0.12, 0.52), (0.5, 0.49), (0.88, 0.51)]);
        assert!(stroke_matches(&line, &horizontal().median));
    }

    #[test]
    fn test_reversed_stroke_rejected() {
        let line = drawn(&[(0.88, 0.5), (0.12, 0.5)]);
        assert!(!stroke_matches(&line, &horizontal().median));
    }

    #[test]
    fn test_wrong_stroke_rejected() {
        let line = drawn(&[(0.5, 0.1), (0.5, 0.9)]);
        assert!(!stroke_matches(&line, &horizontal().median));
    }

    #[test]
    fn test_single_point_rejected() {
        assert!(!stroke_matches(&drawn(&[(0.1, 0.5)]), &horizontal().median));
        assert!(!stroke_matches(&[], &horizontal().median));
    }

    #[test]
    fn test_quiz_flow_with_hint() {
        let strokes = vec![horizontal(), vertical()];
        let mut quiz = Quiz::new(strokes.len(), 2);

        let wrong = drawn(&[(0.5, 0.9), (0.5, 0.1)]);
        assert_eq!(
            quiz.submit(&wrong, &strokes),
            Some(QuizOutcome::Miss { stroke: 0, misses: 1 })
        );
        assert_eq!(quiz.hinted_stroke(), None);
        quiz.submit(&wrong, &strokes);
        assert_eq!(quiz.hinted_stroke(), Some(0));

        let first = drawn(&[(0.1, 0.5), (0.9, 0.5)]);
        assert_eq!(
            quiz.submit(&first, &strokes),
            Some(QuizOutcome::Correct { stroke: 0 })
        );
        assert_eq!(quiz.hinted_stroke(), None);
        assert_eq!(quiz.completed_strokes(), 1);

        let second = drawn(&[(0.5, 0.1), (0.5, 0.9)]);
        assert_eq!(
            quiz.submit(&second, &strokes),
            Some(QuizOutcome::Complete { total_misses: 2 })
        );
        assert!(quiz.is_complete());
        assert_eq!(quiz.submit(&second, &strokes), None);
    }
}
