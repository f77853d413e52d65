//! Stroke Data and Geometry
//!
//! Raw stroke data comes from the `hanzi-writer-data` set: one SVG outline
//! path and one median (centre line) per stroke, in a 1024-unit box whose y
//! axis points up with the baseline at 900. [`StrokeGeometry`] converts that
//! into normalized coordinates (0..1, y down) that any surface can scale.

use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use serde::{Deserialize, Serialize};

use super::source::StrokeError;

/// Side of the square the data is authored in
pub const DATA_SIZE: f64 = 1024.0;

/// Data-space y coordinate that maps to the top of the box
const DATA_TOP: f64 = 900.0;

/// Flattening tolerance for curves, in data units
const FLATTEN_TOLERANCE: f32 = 4.0;

/// A point in normalized board space (0..1, y down)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, 0 = left edge
    pub x: f64,
    /// Vertical position, 0 = top edge
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a data-space coordinate
    #[must_use]
    pub fn from_data(x: f64, y: f64) -> Self {
        Self {
            x: x / DATA_SIZE,
            y: (DATA_TOP - y) / DATA_SIZE,
        }
    }

    /// Euclidean distance
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Stroke data for one character, as published by `hanzi-writer-data`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStrokes {
    /// One SVG outline path per stroke, in drawing order
    pub strokes: Vec<String>,
    /// One median polyline per stroke, in data coordinates
    pub medians: Vec<Vec<[f64; 2]>>,
    /// Indices of strokes that belong to the radical
    #[serde(default)]
    pub rad_strokes: Vec<usize>,
}

impl CharacterStrokes {
    /// Number of strokes
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Whether there are no strokes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Build drawable geometry for every stroke
    pub fn geometry(&self) -> Result<Vec<StrokeGeometry>, StrokeError> {
        if self.strokes.len() != self.medians.len() {
            return Err(StrokeError::Malformed(format!(
                "{} stroke paths but {} medians",
                self.strokes.len(),
                self.medians.len()
            )));
        }
        if self.strokes.is_empty() {
            return Err(StrokeError::Malformed("no strokes".to_string()));
        }

        self.strokes
            .iter()
            .zip(&self.medians)
            .enumerate()
            .map(|(i, (path, median))| {
                StrokeGeometry::from_data(path, median, self.rad_strokes.contains(&i))
            })
            .collect()
    }
}

/// Drawable geometry for one stroke
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeGeometry {
    /// Closed outline polygon
    pub outline: Vec<Point>,
    /// Centre line, in drawing direction
    pub median: Vec<Point>,
    /// Length of the median in data units
    pub median_length: f64,
    /// Whether this stroke is part of the radical
    pub is_radical: bool,
}

impl StrokeGeometry {
    /// Build from an SVG path and a data-space median
    pub fn from_data(path: &str, median: &[[f64; 2]], is_radical: bool) -> Result<Self, StrokeError> {
        if median.is_empty() {
            return Err(StrokeError::Malformed("empty median".to_string()));
        }

        let outline = flatten_svg_path(path)?;
        let median: Vec<Point> = median.iter().map(|[x, y]| Point::from_data(*x, *y)).collect();
        let median_length = polyline_length(&median) * DATA_SIZE;

        Ok(Self {
            outline,
            median,
            median_length,
            is_radical,
        })
    }
}

/// Total length of a polyline
#[must_use]
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|p| p[0].distance(p[1])).sum()
}

/// Flatten an absolute `M/L/Q/C/Z` SVG path into a normalized polygon
pub fn flatten_svg_path(d: &str) -> Result<Vec<Point>, StrokeError> {
    let path = parse_svg_path(d)?;
    let mut polygon = Vec::new();

    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => {
                polygon.push(Point::from_data(f64::from(at.x), f64::from(at.y)));
            }
            PathEvent::Line { to, .. } => {
                polygon.push(Point::from_data(f64::from(to.x), f64::from(to.y)));
            }
            _ => {}
        }
    }

    if polygon.len() < 3 {
        return Err(StrokeError::Malformed(format!("degenerate stroke path: {d}")));
    }
    Ok(polygon)
}

/// Parse the path commands used by the stroke data into a lyon path
fn parse_svg_path(d: &str) -> Result<Path, StrokeError> {
    let tokens = tokenize(d);
    let mut builder = Path::builder();
    let mut open = false;
    let mut i = 0;

    let number = |idx: usize| -> Result<f32, StrokeError> {
        match tokens.get(idx) {
            Some(PathToken::Number(n)) => Ok(*n),
            _ => Err(StrokeError::Malformed(format!("expected number in path: {d}"))),
        }
    };

    while i < tokens.len() {
        let PathToken::Command(cmd) = tokens[i] else {
            return Err(StrokeError::Malformed(format!("expected command in path: {d}")));
        };
        i += 1;

        match cmd {
            'M' => {
                if open {
                    builder.end(false);
                }
                builder.begin(point(number(i)?, number(i + 1)?));
                open = true;
                i += 2;
            }
            'L' if open => {
                builder.line_to(point(number(i)?, number(i + 1)?));
                i += 2;
            }
            'Q' if open => {
                builder.quadratic_bezier_to(
                    point(number(i)?, number(i + 1)?),
                    point(number(i + 2)?, number(i + 3)?),
                );
                i += 4;
            }
            'C' if open => {
                builder.cubic_bezier_to(
                    point(number(i)?, number(i + 1)?),
                    point(number(i + 2)?, number(i + 3)?),
                    point(number(i + 4)?, number(i + 5)?),
                );
                i += 6;
            }
            'Z' | 'z' => {
                if open {
                    builder.end(true);
                    open = false;
                }
            }
            other => {
                return Err(StrokeError::Malformed(format!(
                    "unsupported path command '{other}' in: {d}"
                )));
            }
        }
    }

    if open {
        builder.end(false);
    }
    Ok(builder.build())
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PathToken {
    Command(char),
    Number(f32),
}

fn tokenize(d: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    let mut num = String::new();

    let flush = |num: &mut String, tokens: &mut Vec<PathToken>| {
        if !num.is_empty() {
            if let Ok(n) = num.parse() {
                tokens.push(PathToken::Number(n));
            }
            num.clear();
        }
    };

    for c in d.chars() {
        match c {
            '0'..='9' | '.' => num.push(c),
            '-' => {
                flush(&mut num, &mut tokens);
                num.push(c);
            }
            c if c.is_ascii_alphabetic() => {
                flush(&mut num, &mut tokens);
                tokens.push(PathToken::Command(c));
            }
            _ => flush(&mut num, &mut tokens),
        }
    }
    flush(&mut num, &mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    // Stroke 0 of 一 from the data set, trimmed
    const YI_PATH: &str = "M 518 382 Q 572 385 623 389 Q 758 399 900 383 Q 928 379 935 390 \
                           Q 944 405 928 419 Q 891 449 837 449 Q 724 449 608 429 \
                           Q 282 392 145 377 Q 117 374 105 364 Q 93 351 117 342 \
                           Q 196 318 318 345 Q 354 351 518 382 Z";

    #[test]
    fn test_point_from_data_flips_y() {
        let top_left = Point::from_data(0.0, 900.0);
        assert!((top_left.x).abs() < 1e-9);
        assert!((top_left.y).abs() < 1e-9);

        let bottom = Point::from_data(512.0, -124.0);
        assert!((bottom.x - 0.5).abs() < 1e-9);
        assert!((bottom.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tokenize_handles_commas_and_negatives() {
        let tokens = tokenize("M10,-20L-5 6Z");
        assert_eq!(
            tokens,
            vec![
                PathToken::Command('M'),
                PathToken::Number(10.0),
                PathToken::Number(-20.0),
                PathToken::Command('L'),
                PathToken::Number(-5.0),
                PathToken::Number(6.0),
                PathToken::Command('Z'),
            ]
        );
    }

    #[test]
    fn test_flatten_real_stroke() {
        let polygon = flatten_svg_path(YI_PATH).unwrap();
        assert!(polygon.len() > 10);
        for p in &polygon {
            assert!((0.0..=1.0).contains(&p.x), "x out of range: {p:?}");
            assert!((0.0..=1.0).contains(&p.y), "y out of range: {p:?}");
        }
    }

    #[test]
    fn test_flatten_rejects_garbage() {
        assert!(flatten_svg_path("M 0 0 X 1 1").is_err());
        assert!(flatten_svg_path("M 0 0").is_err());
        assert!(flatten_svg_path("L 0 0 1 1").is_err());
    }

    #[test]
    fn test_geometry_requires_matching_medians() {
        let data = CharacterStrokes {
            strokes: vec![YI_PATH.to_string()],
            medians: vec![],
            rad_strokes: vec![],
        };
        assert!(matches!(data.geometry(), Err(StrokeError::Malformed(_))));
    }

    #[test]
    fn test_geometry_marks_radicals_and_length() {
        let data = CharacterStrokes {
            strokes: vec![YI_PATH.to_string()],
            medians: vec![vec![[121.0, 358.0], [500.0, 400.0], [921.0, 406.0]]],
            rad_strokes: vec![0],
        };
        let geometry = data.geometry().unwrap();
        assert_eq!(geometry.len(), 1);
        assert!(geometry[0].is_radical);
        assert!(geometry[0].median_length > 790.0 && geometry[0].median_length < 810.0);
    }

    #[test]
    fn test_deserialize_without_radicals() {
        let json = r#"{"strokes":["M 0 0 L 10 0 L 10 10 Z"],"medians":[[[0,0],[10,10]]]}"#;
        let data: CharacterStrokes = serde_json::from_str(json).unwrap();
        assert_eq!(data.len(), 1);
        assert!(data.rad_strokes.is_empty());
    }
}
