//! Direct mode: pass everything through, converting width on request.

use mabiao_engine::{is_convertible_punct, punct_to_fullwidth, to_fullwidth};

use super::*;

impl TableEngine {
    /// Width conversion for the current input mode, if one applies.
    /// Punctuation follows the punctuation preference, everything else the
    /// letter preference.
    pub(super) fn convert_width(&self, ch: char) -> Option<char> {
        let index = self.input_mode.index();
        if is_convertible_punct(ch) {
            self.settings.width.full_width_punct[index].then(|| punct_to_fullwidth(ch))
        } else {
            self.settings.width.full_width_letter[index].then(|| to_fullwidth(ch))
        }
    }

    pub(super) fn process_direct(&mut self, key: &KeyEvent) -> EngineResult {
        // Releases and non-printable keys always pass through untouched.
        let Some(ch) = key.to_char() else {
            return EngineResult::not_consumed();
        };
        match self.convert_width(ch) {
            Some(converted) => EngineResult::consumed()
                .with_action(EngineAction::Commit(converted.to_string())),
            None => EngineResult::not_consumed(),
        }
    }
}
