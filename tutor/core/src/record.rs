//! Character Records
//!
//! The learning data shown in the detail panel. A record is built once per
//! lookup and replaced wholesale by the next one.

use serde::{Deserialize, Serialize};

use crate::glyph::Glyph;

/// Pinyin used when a lookup fails
pub const SENTINEL_PINYIN: &str = "Unknown";
/// Definition used when a lookup fails
pub const SENTINEL_DEFINITION: &str = "Could not retrieve definition.";
/// Example sentence used when a lookup fails
pub const SENTINEL_EXAMPLE: &str = "N/A";
/// Example translation used when a lookup fails
pub const SENTINEL_TRANSLATION: &str = "Please check your API Key or connection.";

/// Learning data for one character
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    /// The character this record describes
    pub char: String,
    /// Pronunciation with tone marks
    pub pinyin: String,
    /// Concise English definition
    pub definition: String,
    /// Simple example sentence using the character
    pub example: String,
    /// English translation of the example
    pub example_translation: String,
}

impl CharacterRecord {
    /// Build the placeholder record substituted for any failed lookup
    #[must_use]
    pub fn sentinel(glyph: Glyph) -> Self {
        Self {
            char: glyph.to_string(),
            pinyin: SENTINEL_PINYIN.to_string(),
            definition: SENTINEL_DEFINITION.to_string(),
            example: SENTINEL_EXAMPLE.to_string(),
            example_translation: SENTINEL_TRANSLATION.to_string(),
        }
    }

    /// Whether this record is the failure placeholder
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.pinyin == SENTINEL_PINYIN
            && self.definition == SENTINEL_DEFINITION
            && self.example == SENTINEL_EXAMPLE
            && self.example_translation == SENTINEL_TRANSLATION
    }

    /// The glyph this record describes, if the `char` field holds one
    #[must_use]
    pub fn glyph(&self) -> Option<Glyph> {
        Glyph::first_of(&self.char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sentinel_fields() {
        let record = CharacterRecord::sentinel(Glyph::new('猫'));
        assert_eq!(
            record,
            CharacterRecord {
                char: "猫".to_string(),
                pinyin: "Unknown".to_string(),
                definition: "Could not retrieve definition.".to_string(),
                example: "N/A".to_string(),
                example_translation: "Please check your API Key or connection.".to_string(),
            }
        );
        assert!(record.is_sentinel());
        assert_eq!(record.glyph(), Some(Glyph::new('猫')));
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let record = CharacterRecord::sentinel(Glyph::new('水'));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["exampleTranslation"], SENTINEL_TRANSLATION);
        assert!(json.get("example_translation").is_none());
    }
}
