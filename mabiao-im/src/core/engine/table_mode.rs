//! Table-mode key dispatch.
//!
//! Classification order: composition controls (Escape, Enter, Tab), cursor
//! movement through the preedit, deletion, paging, candidate selection,
//! then input characters. Anything left over passes through to the
//! application.

use mabiao_engine::Editor;

use super::*;

impl TableEngine {
    pub(super) fn process_table(&mut self, key: &KeyEvent) -> EngineResult {
        // All editing happens on presses; releases pass through (hotkeys
        // were already handled).
        if !key.is_press {
            return EngineResult::not_consumed();
        }
        let composing = self.is_composing();
        let ctrl = key.modifiers.control_key;

        match key.keysym {
            Keysym::ESCAPE if composing => {
                self.editor.clear_all_input_and_preedit();
                self.render()
            }
            Keysym::RETURN if composing => {
                let mut result = EngineResult::consumed();
                if self.settings.mode.auto_select {
                    self.commit_all_to_host(&mut result);
                } else {
                    // The typed keys themselves are the text here
                    // (transliteration-style tables).
                    self.commit_raw_to_host(&mut result);
                }
                self.render_into(&mut result);
                result
            }
            Keysym::TAB if composing && self.settings.mode.auto_select => {
                let mut result = EngineResult::consumed();
                self.commit_all_to_host(&mut result);
                self.render_into(&mut result);
                result
            }
            Keysym::LEFT if composing && ctrl => self.edit_op(Editor::control_arrow_left),
            Keysym::LEFT if composing => self.edit_op(Editor::arrow_left),
            Keysym::RIGHT if composing && ctrl => self.edit_op(Editor::control_arrow_right),
            Keysym::RIGHT if composing => self.edit_op(Editor::arrow_right),
            Keysym::HOME if composing => self.edit_op(Editor::control_arrow_left),
            Keysym::END if composing => self.edit_op(Editor::control_arrow_right),
            Keysym::DOWN if composing => self.edit_op(Editor::cursor_down),
            Keysym::UP if composing => self.edit_op(Editor::cursor_up),
            Keysym::BACKSPACE if composing && ctrl => {
                self.edit_op(Editor::remove_preedit_before_cursor)
            }
            Keysym::BACKSPACE if composing => self.backspace(),
            Keysym::DELETE if composing && ctrl => {
                self.edit_op(Editor::remove_preedit_after_cursor)
            }
            Keysym::DELETE if composing => {
                self.edit_op(Editor::remove_preedit_character_after_cursor)
            }
            keysym if composing && self.page_up_keys.contains(&keysym) => {
                self.edit_op(Editor::page_up)
            }
            keysym if composing && self.page_down_keys.contains(&keysym) => {
                self.edit_op(Editor::page_down)
            }
            keysym => {
                let Some(ch) = keysym.to_char() else {
                    return EngineResult::not_consumed();
                };
                let mods = key.modifiers;
                if composing
                    && !self.editor.candidates().is_empty()
                    && self.editor.select_key_index(ch).is_some()
                    && !mods.super_key
                {
                    return self.handle_select_key(ch, mods);
                }
                if mods.control_key || mods.alt_key || mods.super_key {
                    return EngineResult::not_consumed();
                }
                self.handle_input_char(ch)
            }
        }
    }

    fn edit_op(&mut self, op: impl FnOnce(&mut Editor) -> bool) -> EngineResult {
        op(&mut self.editor);
        self.render()
    }

    /// Backspace edits the live segment first, then eats back into the
    /// precommitted phrases.
    fn backspace(&mut self) -> EngineResult {
        if !self.editor.is_empty() {
            self.editor.pop_input();
        } else {
            self.editor.remove_preedit_character_before_cursor();
        }
        self.render()
    }

    /// Selection keys: plain finalizes into the preedit, Ctrl commits
    /// through to the host, Alt drops the candidate's user record.
    fn handle_select_key(&mut self, ch: char, mods: KeyModifiers) -> EngineResult {
        let mut result = EngineResult::consumed();
        if mods.alt_key {
            self.editor.remove_candidate_from_user_database(ch);
        } else if mods.control_key {
            if self.editor.select_key(ch) {
                self.drain_precommit_to_host(&mut result);
            }
        } else if self.editor.select_key(ch) {
            self.maybe_auto_commit(&mut result);
        }
        self.render_into(&mut result);
        result
    }

    fn handle_input_char(&mut self, ch: char) -> EngineResult {
        let composing = self.is_composing();
        let valid = self.editor.is_valid_input_char(ch);

        if !composing {
            // Leading edge: input that could never match is rejected
            // immediately and passes through (width-converted). Wildcards
            // may always open a segment.
            if !valid
                || !(self.editor.is_wildcard(ch) || self.editor.metadata().is_start_char(ch))
            {
                return match self.convert_width(ch) {
                    Some(converted) => EngineResult::consumed()
                        .with_action(EngineAction::Commit(converted.to_string())),
                    None => EngineResult::not_consumed(),
                };
            }
            let mut result = EngineResult::consumed();
            self.editor.add_input(ch);
            self.render_into(&mut result);
            return result;
        }

        if valid {
            let mut result = EngineResult::consumed();
            let matched = self.editor.add_input(ch);
            if !matched
                && self.settings.mode.auto_select
                && !self.editor.candidates_prev().is_empty()
            {
                // Dead end one key past a live match: finalize that match
                // and replay this key as a fresh segment.
                self.editor.pop_input();
                self.editor.commit_to_preedit();
                self.editor.add_input(ch);
            }
            self.maybe_auto_commit(&mut result);
            self.render_into(&mut result);
            return result;
        }

        // Trailing invalid input: flush the pending composition, then
        // deliver this character itself, width-converted.
        let mut result = EngineResult::consumed();
        self.commit_all_to_host(&mut result);
        let delivered = self.convert_width(ch).unwrap_or(ch);
        result
            .actions
            .push(EngineAction::Commit(delivered.to_string()));
        self.render_into(&mut result);
        result
    }
}
