//! Learning Session
//!
//! Per-run state owned by the Tutor. Nothing here is persisted.

use crate::glyph::Glyph;
use crate::record::CharacterRecord;
use crate::strokes::BoardHandle;

/// State of the current learning session
#[derive(Clone, Debug)]
pub struct Session {
    /// Character selected by the most recent submission
    current_char: Glyph,
    /// Details of the most recently issued lookup, once it completes
    data: Option<CharacterRecord>,
    /// Whether a lookup is in flight
    loading: bool,
    /// Control handle of the current board instance, once ready
    board_handle: Option<BoardHandle>,
}

impl Session {
    /// Fresh session showing `initial`
    pub fn new(initial: Glyph) -> Self {
        Self {
            current_char: initial,
            data: None,
            loading: false,
            board_handle: None,
        }
    }

    /// Selected character
    pub fn current_char(&self) -> Glyph {
        self.current_char
    }

    /// Details for the selected character, if loaded
    pub fn data(&self) -> Option<&CharacterRecord> {
        self.data.as_ref()
    }

    /// Whether a lookup is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Handle for the ready board, if any
    pub fn board_handle(&self) -> Option<BoardHandle> {
        self.board_handle
    }

    /// A new character was selected and its lookup issued
    pub(crate) fn begin_lookup(&mut self, glyph: Glyph) {
        self.current_char = glyph;
        self.loading = true;
        self.board_handle = None;
    }

    /// The latest lookup finished
    pub(crate) fn complete_lookup(&mut self, record: CharacterRecord) {
        self.data = Some(record);
        self.loading = false;
    }

    /// The board for the current character became ready
    pub(crate) fn set_board_handle(&mut self, handle: BoardHandle) {
        self.board_handle = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_cycle() {
        let mut session = Session::new(Glyph::new('猫'));
        assert!(session.data().is_none());
        assert!(!session.is_loading());

        session.begin_lookup(Glyph::new('水'));
        assert_eq!(session.current_char(), Glyph::new('水'));
        assert!(session.is_loading());

        session.complete_lookup(CharacterRecord::sentinel(Glyph::new('水')));
        assert!(!session.is_loading());
        assert!(session.data().is_some_and(CharacterRecord::is_sentinel));
    }
}
