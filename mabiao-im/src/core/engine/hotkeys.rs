//! Mode-switch hotkeys.
//!
//! All hotkeys fire on key release with exact modifier state, and only when
//! the release immediately follows its own press — a Shift used as a
//! modifier for another key must not toggle anything. Printable combos are
//! swallowed on press so the application never sees them.

use mabiao_engine::ChineseMode;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hotkey {
    /// Left Shift: direct <-> table input
    TableInput,
    /// Right Shift: pinyin sub-mode
    Pinyin,
    /// Shift+Space: fullwidth letters for the current mode
    FullWidthLetter,
    /// Ctrl+period: fullwidth punctuation for the current mode
    FullWidthPunct,
    /// Ctrl+comma: single-character matches only
    OneChar,
    /// Ctrl+slash: auto-commit straight to the application
    AutoCommit,
    /// Ctrl+semicolon: cycle the Chinese-variant filter
    ChineseModeCycle,
    /// Left Alt: next candidate within the page
    CycleCandidate,
}

impl TableEngine {
    fn hotkey_for(&self, key: &KeyEvent) -> Option<Hotkey> {
        let mods = key.modifiers;
        let ctrl_only =
            mods.control_key && !mods.alt_key && !mods.super_key && !mods.shift_key;
        let shift_only =
            mods.shift_key && !mods.control_key && !mods.alt_key && !mods.super_key;
        // Hosts differ on whether a modifier's own release still reports
        // its mask, so accept both for the modifier hotkeys.
        let bare_shift = mods.is_empty() || shift_only;
        let bare_alt = !mods.control_key && !mods.shift_key && !mods.super_key;
        let table = self.input_mode == InputMode::Table;
        let meta = self.editor.metadata();

        match key.keysym {
            Keysym::SHIFT_L if bare_shift && !self.is_composing() => Some(Hotkey::TableInput),
            Keysym::SHIFT_R
                if bare_shift && !self.is_composing() && table && meta.supports_pinyin =>
            {
                Some(Hotkey::Pinyin)
            }
            Keysym::SPACE if shift_only => Some(Hotkey::FullWidthLetter),
            Keysym::PERIOD if ctrl_only => Some(Hotkey::FullWidthPunct),
            Keysym::COMMA if ctrl_only && table && meta.supports_onechar => Some(Hotkey::OneChar),
            Keysym::SLASH if ctrl_only && table => Some(Hotkey::AutoCommit),
            Keysym::SEMICOLON if ctrl_only && table && meta.supports_chinese_mode => {
                Some(Hotkey::ChineseModeCycle)
            }
            Keysym::ALT_L if bare_alt && table && self.is_composing() => {
                Some(Hotkey::CycleCandidate)
            }
            _ => None,
        }
    }

    /// `None` means the key is not a hotkey and dispatch continues.
    pub(super) fn handle_hotkey(&mut self, key: &KeyEvent) -> Option<EngineResult> {
        let hotkey = self.hotkey_for(key)?;
        if key.is_press {
            if key.keysym.is_modifier() {
                // Modifier presses stay visible to the host for its own
                // modifier tracking.
                return None;
            }
            return Some(EngineResult::consumed());
        }
        let follows_own_press = self
            .prev_pressed
            .is_some_and(|(keysym, _)| keysym == key.keysym);
        if !follows_own_press {
            return None;
        }
        Some(self.apply_hotkey(hotkey))
    }

    fn apply_hotkey(&mut self, hotkey: Hotkey) -> EngineResult {
        let mut result = EngineResult::consumed();
        let mode_index = self.input_mode.index();
        match hotkey {
            Hotkey::TableInput => {
                let to_table = self.input_mode == InputMode::Direct;
                self.set_input_mode(if to_table {
                    InputMode::Table
                } else {
                    InputMode::Direct
                });
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::TableInput,
                    SettingValue::Bool(to_table),
                ));
            }
            Hotkey::Pinyin => {
                let enabled = !self.settings.mode.pinyin;
                self.settings.mode.pinyin = enabled;
                self.editor.set_py_mode(enabled);
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::Pinyin,
                    SettingValue::Bool(enabled),
                ));
            }
            Hotkey::FullWidthLetter => {
                self.settings.width.full_width_letter[mode_index] ^= true;
                let pair = self.settings.width.full_width_letter;
                self.editor.set_full_width_letter(pair[mode_index]);
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::FullWidthLetter,
                    SettingValue::BoolPair(pair),
                ));
            }
            Hotkey::FullWidthPunct => {
                self.settings.width.full_width_punct[mode_index] ^= true;
                let pair = self.settings.width.full_width_punct;
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::FullWidthPunct,
                    SettingValue::BoolPair(pair),
                ));
            }
            Hotkey::OneChar => {
                let enabled = !self.settings.mode.onechar;
                self.settings.mode.onechar = enabled;
                self.editor.set_onechar(enabled);
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::OneChar,
                    SettingValue::Bool(enabled),
                ));
            }
            Hotkey::AutoCommit => {
                let enabled = !self.settings.mode.auto_commit;
                self.settings.mode.auto_commit = enabled;
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::AutoCommit,
                    SettingValue::Bool(enabled),
                ));
            }
            Hotkey::ChineseModeCycle => {
                let mode = self.settings.mode.chinese_mode.next();
                self.settings.mode.chinese_mode = mode;
                self.editor.set_chinese_mode(mode);
                result.actions.push(EngineAction::WriteConfig(
                    SettingKey::ChineseMode,
                    SettingValue::Text(chinese_mode_str(mode).to_string()),
                ));
            }
            Hotkey::CycleCandidate => {
                self.editor.cycle_next_cand();
            }
        }
        self.render_into(&mut result);
        result
    }
}

pub(super) fn chinese_mode_str(mode: ChineseMode) -> &'static str {
    match mode {
        ChineseMode::SimplifiedOnly => "simplified-only",
        ChineseMode::TraditionalOnly => "traditional-only",
        ChineseMode::SimplifiedFirst => "simplified-first",
        ChineseMode::TraditionalFirst => "traditional-first",
        ChineseMode::All => "all",
    }
}
