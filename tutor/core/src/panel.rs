//! Detail Panel
//!
//! What the panel shows is decided here so every surface agrees: a loading
//! placeholder while a lookup is in flight, an invitation when nothing has
//! been looked up yet, and the record otherwise.

use serde::{Deserialize, Serialize};

use crate::record::CharacterRecord;
use crate::speech::Utterance;

/// Shown while the model is working
pub const LOADING_PLACEHOLDER: &str = "正在让 AI 思考中...";

/// Shown before the first lookup completes
pub const EMPTY_PLACEHOLDER: &str = "请输入汉字开始学习";

/// Panel header
pub const PANEL_TITLE: &str = "汉字详情";

/// What the panel displays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelView<'a> {
    /// A lookup is in flight
    Loading,
    /// No data yet
    Empty,
    /// Showing a record
    Populated(&'a CharacterRecord),
}

impl<'a> PanelView<'a> {
    /// Pick the view for the current session state; loading wins
    #[must_use]
    pub fn of(data: Option<&'a CharacterRecord>, loading: bool) -> Self {
        match (loading, data) {
            (true, _) => Self::Loading,
            (false, None) => Self::Empty,
            (false, Some(record)) => Self::Populated(record),
        }
    }

    /// Placeholder text for the non-populated views
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING_PLACEHOLDER),
            Self::Empty => Some(EMPTY_PLACEHOLDER),
            Self::Populated(_) => None,
        }
    }
}

/// Which part of the record to read aloud
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakTarget {
    /// The character itself
    Character,
    /// The example sentence
    Example,
}

impl SpeakTarget {
    /// Build the utterance for this target
    #[must_use]
    pub fn utterance(self, record: &CharacterRecord, rate: f32) -> Utterance {
        let text = match self {
            Self::Character => &record.char,
            Self::Example => &record.example,
        };
        Utterance::mandarin(text.clone()).with_rate(rate)
    }
}
