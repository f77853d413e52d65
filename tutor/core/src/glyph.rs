//! Glyphs
//!
//! A glyph is one Chinese character, held as a single Unicode code point.
//! All user input passes through [`Glyph::first_of`] before it reaches the
//! fetcher or the board, so nothing downstream ever sees multi-character text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single character the tutor can look up and draw
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Glyph(char);

impl Glyph {
    /// Wrap a character
    #[must_use]
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    /// Take the first glyph of free-form input
    ///
    /// Surrounding whitespace is ignored. Returns `None` when nothing but
    /// whitespace was entered.
    #[must_use]
    pub fn first_of(input: &str) -> Option<Self> {
        input.trim().chars().next().map(Self)
    }

    /// The underlying character
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for Glyph {
    fn from(c: char) -> Self {
        Self(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_truncates() {
        assert_eq!(Glyph::first_of("猫咪"), Some(Glyph::new('猫')));
        assert_eq!(Glyph::first_of("  水 "), Some(Glyph::new('水')));
    }

    #[test]
    fn test_first_of_empty() {
        assert_eq!(Glyph::first_of(""), None);
        assert_eq!(Glyph::first_of("   \t"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Glyph::new('永').to_string(), "永");
    }
}
