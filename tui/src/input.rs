//! Input Field
//!
//! The single-character input box. It holds at most one glyph: typing
//! replaces the current glyph and pasting keeps only the first one.

use tutor_core::Glyph;

/// Placeholder shown while the field is empty
pub const INPUT_PLACEHOLDER: &str = "输入汉字 (Enter a character)";

/// The input field's contents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
}

impl InputField {
    /// Empty field
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, as submitted
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the field is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// A character was typed
    pub fn push(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.value.clear();
        self.value.push(c);
    }

    /// Text was pasted
    pub fn paste(&mut self, text: &str) {
        if let Some(glyph) = Glyph::first_of(text) {
            self.value = glyph.to_string();
        }
    }

    /// Backspace
    pub fn backspace(&mut self) {
        self.value.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_keeps_one_glyph() {
        let mut field = InputField::new();
        field.push('猫');
        field.push('咪');
        assert_eq!(field.value(), "咪");
    }

    #[test]
    fn test_paste_keeps_first_glyph() {
        let mut field = InputField::new();
        field.paste("  猫咪 ");
        assert_eq!(field.value(), "猫");

        field.paste("   ");
        assert_eq!(field.value(), "猫");
    }

    #[test]
    fn test_backspace_and_controls() {
        let mut field = InputField::new();
        field.push('\t');
        assert!(field.is_empty());
        field.push('水');
        field.backspace();
        assert!(field.is_empty());
    }
}
